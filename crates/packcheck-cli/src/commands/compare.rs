//! Archive compare command

use super::StrategyArg;
use clap::Args;
use packcheck_core::compare::{compare_archives, render_human_summary, CompareOptions};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Reference archive
    pub a: PathBuf,

    /// Candidate archive
    pub b: PathBuf,

    #[arg(long, value_enum, default_value = "normalized")]
    pub strategy: StrategyArg,

    /// Additional entries (or `dir/` prefixes) to leave out of the comparison
    #[arg(long = "skip")]
    pub skip: Vec<String>,

    /// Directory receiving both payloads of every mismatched entry
    #[arg(long)]
    pub dump_dir: Option<PathBuf>,

    /// Print the full result as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CompareArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let mut options = CompareOptions::default()
        .with_strategy(args.strategy.into())
        .skipping(args.skip);
    if let Some(dir) = args.dump_dir {
        options = options.with_dump_dir(dir);
    }

    let result = compare_archives(&args.a, &args.b, &options)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_human_summary(&result));
    }
    Ok(result.is_identical())
}
