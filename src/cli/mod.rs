use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod demo;
mod formats;

/// lasframe - consistent in-memory LAS point clouds
#[derive(Parser)]
#[command(name = "lasframe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a demo dataset, edit it and print a JSON summary
    Demo {
        /// Load header settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Number of points to generate
        #[arg(short = 'n', long, default_value = "1000")]
        points: usize,
    },

    /// List the standard fields of every point format
    Formats,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Demo { config, points } => demo::run(config, points),
        Commands::Formats => formats::run(),
    }
}
