//! This module could be a separate crate on its own, to drive [`crate::session`] from a
//! request script, but it is kept here so the integration tests can use it too.

use std::io::{Read, Write};

use crate::{
    account::Outcome,
    command::SessionCommand,
    session::{SessionError, SessionHandler, in_memory_session::InMemorySession},
};
use anyhow::{Context, Result};
use csv_parser::CsvRequestParser;
use csv_printer::print_statement;
pub mod csv_parser;
pub mod csv_printer;

pub type ReplyPrinter = Box<dyn FnMut(u64, Result<Outcome, SessionError>)>;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub reply_printer: ReplyPrinter,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvRequestParser::new(self.input);

        let mut session = InMemorySession::default();

        for (line, row) in parser {
            let row = row.with_context(|| format!("Failed to parse request at line {line}"))?;
            let reply = SessionCommand::parse_command(row.kind, row.username, row.amount, row.recipient)
                .map_err(SessionError::from)
                .and_then(|command| session.handle_command(command));
            if let Err(err) = &reply {
                tracing::warn!(line, %err, "request failed");
            }
            (self.reply_printer)(line, reply);
        }

        print_statement(self.output, session.accounts())
    }
}
