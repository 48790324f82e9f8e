use anyhow::{Context, Result};
use tracing::info;

use ochre_uci::UciEngine;

fn main() -> Result<()> {
    // stdout carries the protocol.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    info!(version = env!("CARGO_PKG_VERSION"), "ochre starting");

    UciEngine::new().run().context("UCI loop failed")?;
    Ok(())
}
