//! Semantic diff over flattened payloads.
//!
//! ## Entry point
//!
//! ```
//! use packcheck_core::diff::{semantic_diff, DiffRecord};
//! use packcheck_core::flatten::flatten;
//!
//! let a = flatten(br#"{"a":1,"b":2}"#).unwrap();
//! let b = flatten(br#"{"a":1,"b":3}"#).unwrap();
//! assert_eq!(semantic_diff(&a, &b), vec![DiffRecord::Changed("b".to_string())]);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: records come out in leaf-path order, changed/removed
//!   first, then added.
//! - **Raw comparison**: leaves are compared byte for byte, so `1` and `1.0`
//!   differ. Re-serialization drift is surfaced on purpose.

pub mod differ;
pub mod model;

pub use differ::semantic_diff;
pub use model::{DiffRecord, EntryDiagnostic};
