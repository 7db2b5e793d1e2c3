//! Destination manifest emission

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Destination metadata for one finalized table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableManifest {
    /// Primary key columns used by the destination's key-based merge
    pub primary_key: Vec<String>,
    /// Whether the destination should load this table incrementally
    pub incremental: bool,
}

impl TableManifest {
    /// Manifest with the standard `id` primary key
    pub fn new(incremental: bool) -> Self {
        Self {
            primary_key: vec!["id".to_string()],
            incremental,
        }
    }
}

/// Manifest path for a CSV file: `<table>.csv.manifest` next to it
pub fn manifest_path(csv_path: &Path) -> PathBuf {
    let mut name = csv_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(".manifest");
    csv_path.with_file_name(name)
}

/// Write the manifest for a finalized CSV file, returning its path
pub fn write_manifest(csv_path: &Path, manifest: &TableManifest) -> Result<PathBuf> {
    let path = manifest_path(csv_path);
    let file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(file, manifest)?;
    Ok(path)
}
