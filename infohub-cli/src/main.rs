//! Binary crate for the `infohub` terminal client.
//!
//! Stands in for the browser client: one subcommand per tab of the web UI,
//! plus an interactive session for the currency converter. All data comes
//! from the InfoHub backend; this crate only renders it.

use clap::Parser;

mod cli;
mod client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
