/// Single bank account: balance plus its append-only transaction ledger.
/// Every operation validates first and reports rejections as typed errors,
/// so a failed request never touches the balance or the ledger.
pub mod account;

/// Session commands parsed from raw requests, later executed by [`session`].
pub mod command;

/// Session directory interface, plus "in memory" implementation.
/// Maps usernames to accounts and keeps track of who is logged in.
pub mod session;

/// Runs a request script through a session and prints the resulting ledgers.
/// Lives in the library so the integration tests can drive it.
pub mod bin_utils;
