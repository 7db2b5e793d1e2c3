//! Extraction orchestrator
//!
//! Drives the full run: for each configured endpoint, build query parameters,
//! follow the page stream, flatten every record, and route rows to the table
//! writer matching their table name. Opportunities additionally fan out into
//! per-record `resumes` and `applications` fetches, with the parent id
//! injected into every child row.
//!
//! Execution is strictly sequential: one endpoint, one page, one record at a
//! time, child fetches inline before the next opportunity. Writers finalize
//! only after every endpoint completed; the first unrecovered error aborts
//! the run with no table finalized.

mod types;

pub use types::{ChildResource, Endpoint, RunStats, PARENT_ID_COLUMN};

use crate::api::LeverClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::flatten::{flatten_record, FlatRow};
use crate::output::{write_manifest, TableManifest, TableWriter};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Orchestrator for one extraction run
///
/// Owns the API client, the resolved configuration, and the writer registry
/// (one [`TableWriter`] per table name, created lazily on first row).
#[derive(Debug)]
pub struct Extractor {
    client: LeverClient,
    config: Config,
    out_dir: PathBuf,
    writers: HashMap<String, TableWriter>,
    stats: RunStats,
}

impl Extractor {
    /// Create an extractor against the production API
    pub fn new(config: Config, out_dir: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let client = LeverClient::new(&config.authentication.token)?;
        Ok(Self::with_client(config, out_dir, client))
    }

    /// Create an extractor against a custom base URL (used in tests)
    pub fn with_base_url(
        config: Config,
        out_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        config.validate()?;
        let client = LeverClient::with_base_url(&config.authentication.token, base_url)?;
        Ok(Self::with_client(config, out_dir, client))
    }

    fn with_client(config: Config, out_dir: impl Into<PathBuf>, client: LeverClient) -> Self {
        Self {
            client,
            config,
            out_dir: out_dir.into(),
            writers: HashMap::new(),
            stats: RunStats::default(),
        }
    }

    /// Run the extraction for every configured endpoint, then finalize all
    /// tables and emit their manifests
    ///
    /// Any fatal error aborts before finalizing; staged rows for unfinished
    /// tables are discarded and no destination file is updated for them.
    pub async fn run(mut self) -> Result<RunStats> {
        let start = Instant::now();

        let endpoints = self.config.endpoints.clone();
        for endpoint in endpoints {
            self.extract_endpoint(endpoint).await?;
        }

        let incremental = self.config.destination.load_type.is_incremental();
        for (_, mut writer) in self.writers.drain() {
            let rows = writer.finalize()?;
            write_manifest(writer.path(), &TableManifest::new(incremental))?;
            info!("Table '{}' finalized with {rows} rows", writer.table());
            self.stats.add_table();
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Extraction finished: {} records, {} pages, {} tables in {}ms",
            self.stats.records_extracted,
            self.stats.pages_fetched,
            self.stats.tables_finalized,
            self.stats.duration_ms
        );
        Ok(self.stats)
    }

    /// Extract one endpoint end to end
    async fn extract_endpoint(&mut self, endpoint: Endpoint) -> Result<()> {
        info!("Fetching data from {endpoint}");
        let params = self.base_params(endpoint)?;

        let mut pages = self.client.pages(endpoint.as_str(), params);
        while let Some(records) = pages.next_page().await? {
            self.stats.add_page();

            for record in records {
                if endpoint == Endpoint::Opportunities {
                    let id = record
                        .get("id")
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            Error::response_shape(
                                endpoint.as_str(),
                                "record is missing a string 'id'",
                            )
                        })?
                        .to_string();
                    for resource in ChildResource::ALL {
                        self.extract_child(resource, &id).await?;
                    }
                }

                let row = flatten_record(&record)?;
                self.write_row(endpoint.table_name(), &row)?;
                self.stats.add_record();
            }
        }

        info!("{endpoint} extraction completed successfully");
        Ok(())
    }

    /// Fetch one child collection for one opportunity and write its rows
    async fn extract_child(&mut self, resource: ChildResource, opportunity_id: &str) -> Result<()> {
        let path = resource.path(opportunity_id);
        let records = self.client.fetch_all(&path).await?;
        self.stats.add_child_request();
        debug!(
            "Fetched {} {} for opportunity {opportunity_id}",
            records.len(),
            resource.table_name()
        );

        for mut record in records {
            let map = record.as_object_mut().ok_or_else(|| {
                Error::response_shape(&path, "child record is not a JSON object")
            })?;
            map.insert(
                PARENT_ID_COLUMN.to_string(),
                Value::String(opportunity_id.to_string()),
            );

            let row = flatten_record(&record)?;
            self.write_row(resource.table_name(), &row)?;
            self.stats.add_record();
        }
        Ok(())
    }

    /// Build query parameters shared by every page of one endpoint
    fn base_params(&self, endpoint: Endpoint) -> Result<HashMap<String, String>> {
        let mut params = HashMap::new();

        if let Some((start, end)) = self.config.sync_options.date_range()? {
            let field = endpoint.date_filter_field();
            params.insert(
                format!("{field}_start"),
                start.timestamp_millis().to_string(),
            );
            params.insert(format!("{field}_end"), end.timestamp_millis().to_string());
        }

        for (key, value) in &self.config.sync_options.additional_filters {
            if !value.is_empty() {
                params.insert(key.clone(), value.clone());
            }
        }

        Ok(params)
    }

    /// Route one row to the writer for its table, creating it on first use
    fn write_row(&mut self, table: &str, row: &FlatRow) -> Result<()> {
        let writer = match self.writers.entry(table.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(TableWriter::create(table, &self.out_dir)?),
        };
        writer.write(row)
    }

    /// Output directory for this run
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}
