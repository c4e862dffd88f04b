//! `reqs`: turns a scraped course catalog into requirement trees.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
