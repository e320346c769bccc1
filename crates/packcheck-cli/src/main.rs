//! packcheck CLI
//!
//! Command-line interface for comparing and stress-testing document packages

use clap::{Parser, Subcommand};
use packcheck_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "packcheck")]
#[command(about = "packcheck - Document package round-trip verifier", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two archives structurally
    Compare(commands::compare::CompareArgs),
    /// Print the whole-archive (and optionally per-entry) checksum
    Checksum(commands::checksum::ChecksumArgs),
    /// Run the round-trip stress pipeline on archives
    Stress(commands::stress::StressArgs),
    /// Check merge idempotence between two archives
    MergeStress(commands::stress::MergeStressArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::Checksum(args) => commands::checksum::execute(args),
        Commands::Stress(args) => commands::stress::execute(args),
        Commands::MergeStress(args) => commands::stress::execute_merge(args),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
