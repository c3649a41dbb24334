use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::Zero};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EntryKind {
    #[serde(rename = "Initial Balance")]
    Open,
    Deposit,
    Withdraw,
    Transfer,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::Open => "Initial Balance",
            EntryKind::Deposit => "Deposit",
            EntryKind::Withdraw => "Withdraw",
            EntryKind::Transfer => "Transfer",
        })
    }
}

/// Single balance-affecting event in the account ledger.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Entry {
    pub timestamp: DateTime<Utc>,
    pub kind: EntryKind,
    pub debit: Decimal,
    pub credit: Decimal,
    pub resulting_balance: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Deposit amount must be positive.")]
    NonPositiveDeposit,
    #[error("Your balance is insufficient.")]
    InsufficientFunds,
    #[error("Withdrawal amount must be positive.")]
    NonPositiveWithdrawal,
    #[error("Your balance is insufficient for transfer.")]
    InsufficientFundsForTransfer,
    #[error("Transfer amount must be positive.")]
    NonPositiveTransfer,
}

/// Successful result of a balance-changing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
    Deposited {
        amount: Decimal,
        new_balance: Decimal,
    },
    Withdrawn {
        amount: Decimal,
        new_balance: Decimal,
    },
    Transferred {
        amount: Decimal,
        recipient: String,
        new_balance: Decimal,
    },
}

impl Receipt {
    pub fn new_balance(&self) -> Decimal {
        match self {
            Receipt::Deposited { new_balance, .. }
            | Receipt::Withdrawn { new_balance, .. }
            | Receipt::Transferred { new_balance, .. } => *new_balance,
        }
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receipt::Deposited {
                amount,
                new_balance,
            } => write!(
                f,
                "Deposit of {} successful! New Balance: {}.",
                amount.normalize(),
                new_balance.normalize()
            ),
            Receipt::Withdrawn {
                amount,
                new_balance,
            } => write!(
                f,
                "Withdrawal of {} successful! New Balance: {}.",
                amount.normalize(),
                new_balance.normalize()
            ),
            Receipt::Transferred {
                amount,
                recipient,
                new_balance,
            } => write!(
                f,
                "Transfer of {} to {recipient} successful! New Balance: {}.",
                amount.normalize(),
                new_balance.normalize()
            ),
        }
    }
}

/// Plain result value handed to callers outside the core: a success flag,
/// the human readable message and the balance after the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    pub new_balance: Decimal,
}

impl Outcome {
    pub fn succeeded(message: impl Into<String>, new_balance: Decimal) -> Self {
        Self {
            success: true,
            message: message.into(),
            new_balance,
        }
    }

    /// `balance` is only used on failure, when the account was left untouched.
    pub fn from_result(result: &Result<Receipt, AccountError>, balance: Decimal) -> Self {
        match result {
            Ok(receipt) => Self::succeeded(receipt.to_string(), receipt.new_balance()),
            Err(err) => Self {
                success: false,
                message: err.to_string(),
                new_balance: balance,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    owner: String,
    balance: Decimal,
    ledger: Vec<Entry>,
}

impl Account {
    pub fn new(owner: impl Into<String>, initial_balance: Decimal) -> Self {
        let owner: String = owner.into();
        if initial_balance < Decimal::zero() {
            tracing::warn!(%owner, %initial_balance, "opening account with negative balance");
        }
        let mut account = Self {
            owner,
            balance: initial_balance,
            ledger: Vec::new(),
        };
        account.log_transaction(
            EntryKind::Open,
            Decimal::zero(),
            Decimal::zero(),
            "Account created".to_string(),
        );
        account
    }

    /// Opens an account with zero balance.
    pub fn open(owner: impl Into<String>) -> Self {
        Self::new(owner, Decimal::zero())
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn transactions(&self) -> &[Entry] {
        &self.ledger
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<Receipt, AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::NonPositiveDeposit);
        }
        self.balance += amount;
        self.log_transaction(EntryKind::Deposit, Decimal::zero(), amount, String::new());
        Ok(Receipt::Deposited {
            amount,
            new_balance: self.balance,
        })
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<Receipt, AccountError> {
        // insufficient funds wins over a non-positive amount
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds);
        }
        if amount <= Decimal::zero() {
            return Err(AccountError::NonPositiveWithdrawal);
        }
        self.balance -= amount;
        self.log_transaction(EntryKind::Withdraw, amount, Decimal::zero(), String::new());
        Ok(Receipt::Withdrawn {
            amount,
            new_balance: self.balance,
        })
    }

    /// Moves `amount` to `recipient`. The sender records a plain `Withdraw`,
    /// the recipient a `Transfer` naming the sender.
    pub fn transfer(
        &mut self,
        amount: Decimal,
        recipient: &mut Account,
    ) -> Result<Receipt, AccountError> {
        self.check_transfer(amount)?;
        // cannot fail, check_transfer covers what withdraw checks
        self.withdraw(amount)?;
        recipient.receive_transfer(amount, &self.owner);
        Ok(Receipt::Transferred {
            amount,
            recipient: recipient.owner.clone(),
            new_balance: self.balance,
        })
    }

    /// [`Account::transfer`] where sender and recipient are the same account:
    /// a `Withdraw` followed by a `Transfer` from self, balance unchanged.
    pub(crate) fn transfer_to_self(&mut self, amount: Decimal) -> Result<Receipt, AccountError> {
        self.check_transfer(amount)?;
        self.withdraw(amount)?;
        let owner = self.owner.clone();
        self.receive_transfer(amount, &owner);
        Ok(Receipt::Transferred {
            amount,
            recipient: owner,
            new_balance: self.balance,
        })
    }

    fn check_transfer(&self, amount: Decimal) -> Result<(), AccountError> {
        if amount > self.balance {
            return Err(AccountError::InsufficientFundsForTransfer);
        }
        if amount <= Decimal::zero() {
            return Err(AccountError::NonPositiveTransfer);
        }
        Ok(())
    }

    /// Credit side of [`Account::transfer`]. Amount was already validated by the sender.
    pub(crate) fn receive_transfer(&mut self, amount: Decimal, from: &str) {
        self.balance += amount;
        self.log_transaction(
            EntryKind::Transfer,
            Decimal::zero(),
            amount,
            format!("Transfer from {from}"),
        );
    }

    fn log_transaction(
        &mut self,
        kind: EntryKind,
        debit: Decimal,
        credit: Decimal,
        description: String,
    ) {
        tracing::debug!(owner = %self.owner, %kind, %debit, %credit, balance = %self.balance, "ledger entry");
        self.ledger.push(Entry {
            timestamp: Utc::now(),
            kind,
            debit,
            credit,
            resulting_balance: self.balance,
            description,
        });
    }
}
