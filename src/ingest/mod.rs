//! Track catalog ingest.
//!
//! Submodules:
//! - `trackset`: delimited track file reader and the immutable `Trackset`.
//! - `fixtures` (test only): representative track tables.

pub mod trackset;

#[cfg(test)]
pub(crate) mod fixtures;
