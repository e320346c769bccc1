//! Round-trip and merge stress commands

use super::StrategyArg;
use clap::Args;
use packcheck_core::compare::CompareOptions;
use packcheck_harness::{HarnessOptions, RoundTripStressHarness};
use packcheck_store::{PackageDeltaEngine, PackageMergeEngine, PackageModel};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct StressArgs {
    /// Archives to run through the pipeline
    #[arg(required = true)]
    pub archives: Vec<PathBuf>,

    /// Compare clones without stripping entropy first
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value = "normalized")]
    pub strategy: StrategyArg,
}

#[derive(Debug, Args)]
pub struct MergeStressArgs {
    pub a: PathBuf,
    pub b: PathBuf,
}

fn harness(
    options: HarnessOptions,
) -> RoundTripStressHarness<PackageModel, PackageDeltaEngine, PackageMergeEngine> {
    RoundTripStressHarness::new(
        PackageModel,
        PackageDeltaEngine::default(),
        PackageMergeEngine,
        options,
    )
}

pub fn execute(args: StressArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let options = HarnessOptions::default()
        .with_compare(CompareOptions::default().with_strategy(args.strategy.into()))
        .strict(args.strict);
    let harness = harness(options);

    let mut all_passed = true;
    for archive in &args.archives {
        let passed = harness.stress_test(archive);
        println!("{} {}", if passed { "PASS" } else { "FAIL" }, archive.display());
        all_passed &= passed;
    }
    Ok(all_passed)
}

pub fn execute_merge(args: MergeStressArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let passed = harness(HarnessOptions::default()).merge_stress(&args.a, &args.b);
    println!(
        "{} merge {} {}",
        if passed { "PASS" } else { "FAIL" },
        args.a.display(),
        args.b.display()
    );
    Ok(passed)
}
