mod commands;

use crate::commands::{evaluate, info};
use clap::{Parser, Subcommand};
use local_election::results::EvaluationOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and dump info about an election.
    Info {
        /// Election file (JSON)
        election_file: PathBuf,
    },
    /// Evaluate counted ballots and print the seat distribution.
    Evaluate {
        /// Election file (JSON)
        election_file: PathBuf,
        /// Result files (JSON), merged into one result
        result_files: Vec<PathBuf>,
        /// Only evaluate ballots of this district key (e.g., "Rethwisch, Klein Boden")
        #[clap(long)]
        district: Option<String>,
        /// Decimal places of Sainte-Laguë values, overriding the election file
        #[clap(long)]
        scale: Option<u32>,
        /// Decimal places of progress percentages
        #[clap(long, default_value = "1")]
        progress_scale: u32,
        /// Print the result as JSON
        #[clap(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("local_election=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();

    let outcome = match opts.command {
        Command::Info { election_file } => info(&election_file),
        Command::Evaluate {
            election_file,
            result_files,
            district,
            scale,
            progress_scale,
            json,
        } => {
            let options = EvaluationOptions {
                sainte_lague_scale: scale,
                progress_scale,
            };
            evaluate(
                &election_file,
                &result_files,
                district.as_deref(),
                &options,
                json,
            )
        }
    };

    if let Err(e) = outcome {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
