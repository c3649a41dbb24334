use thiserror::Error;

use crate::{
    account::Outcome,
    command::{SessionCommand, SessionCommandError},
};

pub mod in_memory_session;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    CommandErr(#[from] SessionCommandError),
    #[error("No user is logged in.")]
    NotLoggedIn,
    #[error("Recipient does not exist.")]
    UnknownRecipient,
}

/// Executes session commands against the accounts of the current user.
///
/// Rejections coming from the account itself (insufficient funds, non positive
/// amount) are reported as an unsuccessful [`Outcome`], not as [`SessionError`].
pub trait SessionHandler {
    fn handle_command(&mut self, command: SessionCommand) -> Result<Outcome, SessionError>;
}
