use anyhow::Result;
use clap::Parser;

mod cli;
mod client;
mod commands;
mod config;
mod format;
mod repl;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
