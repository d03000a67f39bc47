//! Flight schedule parser and query tool.
//!
//! Validates CSV flight schedules, saves the accepted flights as JSON and
//! answers attribute queries against them.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
