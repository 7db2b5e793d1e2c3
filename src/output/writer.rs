//! Dynamic-schema CSV table writer

use crate::error::{Error, Result};
use crate::flatten::FlatRow;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer for one named table with a schema discovered as rows stream in
///
/// `write` stages each row as a JSON line in `<table>.csv.staging`, unioning
/// any new columns into the schema in first-seen order; it never fails on a
/// schema mismatch. `finalize` writes the CSV header in accumulated order,
/// replays every staged row padding absent columns with empty values, and
/// removes the staging file. Once finalized the writer rejects further rows.
///
/// An unfinalized writer removes its staging file on drop, so an aborted run
/// leaves no destination file for the table.
#[derive(Debug)]
pub struct TableWriter {
    table: String,
    path: PathBuf,
    staging_path: PathBuf,
    staging: BufWriter<File>,
    columns: Vec<String>,
    seen: HashSet<String>,
    rows_staged: usize,
    finalized: bool,
}

impl TableWriter {
    /// Create a writer for `<dir>/<table>.csv`
    pub fn create(table: impl Into<String>, dir: &Path) -> Result<Self> {
        let table = table.into();
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("{table}.csv"));
        let staging_path = dir.join(format!("{table}.csv.staging"));
        let staging = BufWriter::new(File::create(&staging_path)?);

        Ok(Self {
            table,
            path,
            staging_path,
            staging,
            columns: Vec::new(),
            seen: HashSet::new(),
            rows_staged: 0,
            finalized: false,
        })
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Destination CSV path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current schema, in first-seen column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows staged so far
    pub fn rows_staged(&self) -> usize {
        self.rows_staged
    }

    /// Stage one row; its keys may be a subset, superset, or equal to the
    /// current schema
    pub fn write(&mut self, row: &FlatRow) -> Result<()> {
        if self.finalized {
            return Err(Error::WriterClosed {
                table: self.table.clone(),
            });
        }

        for (column, _) in row {
            if !self.seen.contains(column) {
                self.seen.insert(column.clone());
                self.columns.push(column.clone());
            }
        }

        serde_json::to_writer(&mut self.staging, row)?;
        self.staging.write_all(b"\n")?;
        self.rows_staged += 1;
        Ok(())
    }

    /// Fix the header and materialize the CSV, consuming the staged rows
    ///
    /// Returns the number of rows written. Calling this twice is an error.
    pub fn finalize(&mut self) -> Result<usize> {
        if self.finalized {
            return Err(Error::WriterClosed {
                table: self.table.clone(),
            });
        }

        self.staging.flush()?;

        let reader = BufReader::new(File::open(&self.staging_path)?);
        let mut csv = csv::Writer::from_path(&self.path)?;
        csv.write_record(&self.columns)?;

        for line in reader.lines() {
            let line = line?;
            let row: FlatRow = serde_json::from_str(&line)?;
            let values: HashMap<&str, &str> = row
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let record = self
                .columns
                .iter()
                .map(|column| values.get(column.as_str()).copied().unwrap_or(""));
            csv.write_record(record)?;
        }

        csv.flush()?;
        fs::remove_file(&self.staging_path)?;
        self.finalized = true;

        debug!(
            "Finalized table '{}': {} rows, {} columns",
            self.table,
            self.rows_staged,
            self.columns.len()
        );
        Ok(self.rows_staged)
    }
}

impl Drop for TableWriter {
    fn drop(&mut self) {
        // Aborted runs must not leave staged rows behind
        if !self.finalized {
            let _ = fs::remove_file(&self.staging_path);
        }
    }
}
