use std::fs::File;

use anyhow::{Context, Result};
use session_bank::bin_utils::Service;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        reply_printer: Box::new(|line, reply| match reply {
            Ok(outcome) => eprintln!("Line {line}: {}", outcome.message),
            Err(err) => eprintln!("Line {line}: {err}"),
        }),
    };
    service.run()
}
