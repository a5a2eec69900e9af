//! # lasframe CLI
//!
//! Small command-line front end for the `lasframe` library.
//!
//! ## Usage
//!
//! ```bash
//! # Build a demo dataset and print its reconciled header as JSON
//! lasframe demo --points 1000 --config lasframe.toml
//!
//! # List the standard fields of every point format
//! lasframe formats
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::run(cli)
}
