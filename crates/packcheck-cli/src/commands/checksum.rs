//! Archive checksum command

use super::StrategyArg;
use clap::Args;
use packcheck_core::archive::read_archive;
use packcheck_core::checksum::{entry_hashes, whole_archive_hash, ContentHasher};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ChecksumArgs {
    pub archive: PathBuf,

    #[arg(long, value_enum, default_value = "normalized")]
    pub strategy: StrategyArg,

    /// Also list `<hash>  <entry>` for every hashed entry
    #[arg(long)]
    pub per_entry: bool,
}

pub fn execute(args: ChecksumArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let archive = read_archive(&args.archive)?;
    let hasher = ContentHasher::new(args.strategy.into());

    println!("{}", whole_archive_hash(&archive, &hasher));
    if args.per_entry {
        for entry in entry_hashes(&archive, &hasher) {
            println!("{}  {}", entry.hash, entry.name);
        }
    }
    Ok(true)
}
