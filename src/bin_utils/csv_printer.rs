use std::io::Write;

use crate::account::{Account, EntryKind};
use csv::Writer;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// One row of the statement: a ledger entry together with its owner.
#[derive(Debug, Serialize)]
pub struct StatementRow<'a> {
    pub owner: &'a str,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub debit: Option<String>,
    pub credit: Option<String>,
    pub balance: String,
    pub description: &'a str,
}

/// Two decimals, half away from zero.
fn money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn non_zero_money(amount: Decimal) -> Option<String> {
    (!amount.is_zero()).then(|| money(amount))
}

pub fn statement_rows(account: &Account) -> impl Iterator<Item = StatementRow<'_>> {
    account.transactions().iter().map(|entry| StatementRow {
        owner: account.owner(),
        date: entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        kind: entry.kind,
        debit: non_zero_money(entry.debit),
        credit: non_zero_money(entry.credit),
        balance: money(entry.resulting_balance),
        description: &entry.description,
    })
}

pub fn print_statement<'a, W>(
    output: &mut W,
    accounts: impl Iterator<Item = &'a Account>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for row in accounts.flat_map(statement_rows) {
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
