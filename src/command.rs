use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Login,
    Logout,
    Deposit,
    Withdraw,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Login { username: String },
    Logout,
    Deposit { amount: Decimal },
    Withdraw { amount: Decimal },
    Transfer { amount: Decimal, recipient: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionCommandError {
    #[error("Username is required for login")]
    UsernameRequired,
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: RequestKind },
    #[error("Recipient is required for transfer")]
    RecipientRequired,
}

impl SessionCommand {
    /// Amount sign is not checked here, the account reports non-positive amounts itself.
    pub fn parse_command(
        kind: RequestKind,
        username: Option<String>,
        amount: Option<Decimal>,
        recipient: Option<String>,
    ) -> Result<Self, SessionCommandError> {
        match kind {
            RequestKind::Login => match non_empty(username) {
                Some(username) => Ok(Self::Login { username }),
                None => Err(SessionCommandError::UsernameRequired),
            },
            RequestKind::Logout => Ok(Self::Logout),
            RequestKind::Deposit => Ok(Self::Deposit {
                amount: Self::require_amount(kind, amount)?,
            }),
            RequestKind::Withdraw => Ok(Self::Withdraw {
                amount: Self::require_amount(kind, amount)?,
            }),
            RequestKind::Transfer => {
                let amount = Self::require_amount(kind, amount)?;
                let Some(recipient) = non_empty(recipient) else {
                    return Err(SessionCommandError::RecipientRequired);
                };
                Ok(Self::Transfer { amount, recipient })
            }
        }
    }

    fn require_amount(
        kind: RequestKind,
        amount: Option<Decimal>,
    ) -> Result<Decimal, SessionCommandError> {
        amount.ok_or(SessionCommandError::AmountRequired { kind })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
