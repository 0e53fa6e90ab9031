use anyhow::Result;
use clap::Parser;

use crate::commands::Session;
use crate::config::Config;
use crate::repl;

/// The binary takes no flags beyond --help/--version; everything happens at
/// the interactive prompt.
#[derive(Parser)]
#[command(name = "rugplay")]
#[command(version, about = "Interactive CLI client for the Rugplay trading API", long_about = None)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load();
        let session = Session::new(config)?;
        repl::run(session).await
    }
}
