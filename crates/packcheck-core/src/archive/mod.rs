//! Archive model and container I/O.
//!
//! An archive is an ordered collection of uniquely named byte payloads. The
//! on-disk container is a zip file; [`zip_io`] converts between the two.

pub mod model;
pub mod zip_io;

pub use model::{Archive, ArchiveEntry};
pub use zip_io::{read_archive, read_archive_bytes, to_zip_bytes, write_archive};
