//! packcheck harness - round-trip stress testing
//!
//! Drives a [`DocumentModel`](packcheck_core::capabilities::DocumentModel)
//! with its delta and merge engines against the archive comparator and
//! asserts save, clone, self-diff and merge idempotence.

mod guard;
pub mod harness;
pub mod options;

pub use harness::{RoundTripStressHarness, Stage};
pub use options::HarnessOptions;
