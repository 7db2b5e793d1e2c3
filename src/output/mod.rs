//! CSV table output
//!
//! The destination is one CSV file per table, but the full column set is
//! unknown until the last record has been flattened. [`TableWriter`] resolves
//! that conflict with a two-phase design: rows are staged append-only to a
//! sidecar file while the schema grows, and `finalize` materializes the CSV
//! with the fixed header exactly once at end of run.
//!
//! Each finalized table also gets a destination manifest describing its
//! primary key and incremental-load flag.

mod manifest;
mod writer;

pub use manifest::{manifest_path, write_manifest, TableManifest};
pub use writer::TableWriter;
