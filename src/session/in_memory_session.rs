use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    account::{Account, Outcome},
    command::SessionCommand,
};

use super::{SessionError, SessionHandler};

#[derive(Debug, Default)]
pub struct InMemorySession {
    accounts: BTreeMap<String, Account>,
    current_user: Option<String>,
}

impl InMemorySession {
    /// Logs `username` in, opening an empty account on first login.
    pub fn login(&mut self, username: &str) -> Outcome {
        let account = self.accounts.entry(username.to_string()).or_insert_with(|| {
            tracing::info!(username, "opening account on first login");
            Account::open(username)
        });
        let balance = account.balance();
        self.current_user = Some(username.to_string());
        tracing::info!(username, "logged in");
        Outcome::succeeded(format!("Welcome, {username}!"), balance)
    }

    pub fn logout(&mut self) -> Result<Outcome, SessionError> {
        let username = self.current_user.take().ok_or(SessionError::NotLoggedIn)?;
        tracing::info!(%username, "logged out");
        let balance = self
            .accounts
            .get(&username)
            .map(Account::balance)
            .unwrap_or_default();
        Ok(Outcome::succeeded("Logout successful.", balance))
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current_user
            .as_ref()
            .and_then(|user| self.accounts.get(user))
    }

    pub fn account(&self, owner: &str) -> Option<&Account> {
        self.accounts.get(owner)
    }

    /// All accounts ordered by owner.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    fn current_account_mut(&mut self) -> Result<&mut Account, SessionError> {
        let user = self.current_user.as_ref().ok_or(SessionError::NotLoggedIn)?;
        self.accounts.get_mut(user).ok_or(SessionError::NotLoggedIn)
    }

    fn transfer(&mut self, amount: Decimal, recipient: &str) -> Result<Outcome, SessionError> {
        let sender = self
            .current_user
            .clone()
            .ok_or(SessionError::NotLoggedIn)?;
        if sender == recipient {
            let account = self.current_account_mut()?;
            let result = account.transfer_to_self(amount);
            return Ok(Outcome::from_result(&result, account.balance()));
        }
        // take the sender out so both accounts can be borrowed mutably
        let mut account = self
            .accounts
            .remove(&sender)
            .ok_or(SessionError::NotLoggedIn)?;
        let Some(recipient_account) = self.accounts.get_mut(recipient) else {
            self.accounts.insert(sender, account);
            return Err(SessionError::UnknownRecipient);
        };
        let result = account.transfer(amount, recipient_account);
        let outcome = Outcome::from_result(&result, account.balance());
        self.accounts.insert(sender, account);
        Ok(outcome)
    }
}

impl SessionHandler for InMemorySession {
    fn handle_command(&mut self, command: SessionCommand) -> Result<Outcome, SessionError> {
        let outcome = match command {
            SessionCommand::Login { username } => self.login(&username),
            SessionCommand::Logout => self.logout()?,
            SessionCommand::Deposit { amount } => {
                let account = self.current_account_mut()?;
                let result = account.deposit(amount);
                Outcome::from_result(&result, account.balance())
            }
            SessionCommand::Withdraw { amount } => {
                let account = self.current_account_mut()?;
                let result = account.withdraw(amount);
                Outcome::from_result(&result, account.balance())
            }
            SessionCommand::Transfer { amount, recipient } => self.transfer(amount, &recipient)?,
        };
        if !outcome.success {
            tracing::warn!(user = ?self.current_user, message = %outcome.message, "request rejected");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::{FromPrimitive, Zero};

    use crate::account::EntryKind;

    use super::*;

    fn dec(value: u32) -> Decimal {
        Decimal::from_u32(value).unwrap()
    }

    #[test]
    fn login_opens_account_once() {
        let mut session = InMemorySession::default();
        let outcome = session
            .handle_command(SessionCommand::Login {
                username: "alice".to_string(),
            })
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message, "Welcome, alice!");
        assert_eq!(session.current_user(), Some("alice"));

        session
            .handle_command(SessionCommand::Deposit { amount: dec(10) })
            .unwrap();

        // second login keeps the existing account
        let outcome = session.login("alice");
        assert_eq!(outcome.new_balance, dec(10));
        assert_eq!(session.current_account().unwrap().transactions().len(), 2);
        assert_eq!(session.accounts().count(), 1);
    }

    #[test]
    fn logout() {
        let mut session = InMemorySession::default();
        let err = session.handle_command(SessionCommand::Logout).unwrap_err();
        assert_eq!(err, SessionError::NotLoggedIn);
        assert_eq!(err.to_string(), "No user is logged in.");

        session.login("alice");
        let outcome = session.handle_command(SessionCommand::Logout).unwrap();
        assert_eq!(outcome.message, "Logout successful.");
        assert!(session.current_account().is_none());
        // the account survives logout
        assert!(session.account("alice").is_some());
    }

    #[test]
    fn money_commands_require_login() {
        let mut session = InMemorySession::default();
        for cmd in [
            SessionCommand::Deposit { amount: dec(1) },
            SessionCommand::Withdraw { amount: dec(1) },
            SessionCommand::Transfer {
                amount: dec(1),
                recipient: "bob".to_string(),
            },
        ] {
            let err = session.handle_command(cmd).unwrap_err();
            assert_eq!(err, SessionError::NotLoggedIn);
        }
    }

    #[test]
    fn account_rejections_are_outcomes() {
        let mut session = InMemorySession::default();
        session.login("alice");
        let outcome = session
            .handle_command(SessionCommand::Withdraw { amount: dec(5) })
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Your balance is insufficient.");
        assert_eq!(outcome.new_balance, Decimal::zero());

        let outcome = session
            .handle_command(SessionCommand::Deposit {
                amount: Decimal::zero(),
            })
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Deposit amount must be positive.");
    }

    #[test]
    fn transfer_between_users() {
        let mut session = InMemorySession::default();
        session.login("bob");
        session.login("alice");
        session
            .handle_command(SessionCommand::Deposit { amount: dec(100) })
            .unwrap();

        let outcome = session
            .handle_command(SessionCommand::Transfer {
                amount: dec(20),
                recipient: "bob".to_string(),
            })
            .unwrap();
        assert!(outcome.success);
        assert_eq!(
            outcome.message,
            "Transfer of 20 to bob successful! New Balance: 80."
        );
        assert_eq!(outcome.new_balance, dec(80));

        let alice = session.account("alice").unwrap();
        assert_eq!(alice.balance(), dec(80));
        assert_eq!(alice.transactions().last().unwrap().kind, EntryKind::Withdraw);

        let bob = session.account("bob").unwrap();
        assert_eq!(bob.balance(), dec(20));
        assert_eq!(
            bob.transactions().last().unwrap().description,
            "Transfer from alice"
        );
        assert_eq!(session.current_user(), Some("alice"));
    }

    #[test]
    fn transfer_to_own_account() {
        let mut session = InMemorySession::default();
        session.login("alice");
        session
            .handle_command(SessionCommand::Deposit { amount: dec(10) })
            .unwrap();

        let outcome = session
            .handle_command(SessionCommand::Transfer {
                amount: dec(5),
                recipient: "alice".to_string(),
            })
            .unwrap();
        assert!(outcome.success);
        assert_eq!(
            outcome.message,
            "Transfer of 5 to alice successful! New Balance: 10."
        );
        let alice = session.account("alice").unwrap();
        assert_eq!(alice.balance(), dec(10));
        assert_eq!(alice.transactions().len(), 4);
        assert_eq!(alice.transactions()[2].kind, EntryKind::Withdraw);
        assert_eq!(alice.transactions()[3].kind, EntryKind::Transfer);
        assert_eq!(alice.transactions()[3].description, "Transfer from alice");

        // amount checks still apply and come first
        let outcome = session
            .handle_command(SessionCommand::Transfer {
                amount: dec(500),
                recipient: "alice".to_string(),
            })
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Your balance is insufficient for transfer.");
        let outcome = session
            .handle_command(SessionCommand::Transfer {
                amount: Decimal::zero(),
                recipient: "alice".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.message, "Transfer amount must be positive.");
        assert_eq!(session.account("alice").unwrap().transactions().len(), 4);
    }

    #[test]
    fn transfer_rejections() {
        let mut session = InMemorySession::default();
        session.login("alice");
        session
            .handle_command(SessionCommand::Deposit { amount: dec(10) })
            .unwrap();

        let err = session
            .handle_command(SessionCommand::Transfer {
                amount: dec(5),
                recipient: "nobody".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownRecipient);
        assert_eq!(err.to_string(), "Recipient does not exist.");
        assert_eq!(session.account("alice").unwrap().balance(), dec(10));

        session.login("bob");
        session.login("alice");
        let outcome = session
            .handle_command(SessionCommand::Transfer {
                amount: dec(50),
                recipient: "bob".to_string(),
            })
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Your balance is insufficient for transfer.");

        assert_eq!(session.account("alice").unwrap().balance(), dec(10));
        assert_eq!(session.account("alice").unwrap().transactions().len(), 2);
        assert_eq!(session.account("bob").unwrap().transactions().len(), 1);
    }
}
