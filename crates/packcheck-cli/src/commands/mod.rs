pub mod checksum;
pub mod compare;
pub mod stress;

use clap::ValueEnum;
use packcheck_core::checksum::HashStrategy;

/// Command-line spelling of [`HashStrategy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Raw,
    Normalized,
}

impl From<StrategyArg> for HashStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Raw => HashStrategy::Raw,
            StrategyArg::Normalized => HashStrategy::Normalized,
        }
    }
}
