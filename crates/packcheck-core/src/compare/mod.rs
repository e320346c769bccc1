//! Archive comparison.
//!
//! [`ArchiveComparator::compare`] short-circuits on equal whole-archive
//! hashes, otherwise reconciles per-entry hashes in two name-sorted passes and
//! explains every mismatching structured-text entry with a semantic diff.
//!
//! ```ignore
//! use packcheck_core::compare::{compare_archives, CompareOptions};
//!
//! let result = compare_archives(a_path, b_path, &CompareOptions::default())?;
//! println!("{}", packcheck_core::compare::render_human_summary(&result));
//! ```

pub mod comparator;
mod dump;
pub mod human_summary;
pub mod options;
pub mod result;

pub use comparator::{compare_archives, ArchiveComparator};
pub use human_summary::render_human_summary;
pub use options::CompareOptions;
pub use result::{ComparisonResult, MembershipChange, StructuralFault};
