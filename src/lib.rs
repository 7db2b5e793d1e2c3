//! # Lever extractor
//!
//! Extracts recruiting-pipeline records from the Lever REST API and
//! materializes them as flat CSV tables suitable for incremental loading
//! into a data warehouse.
//!
//! The interesting part is not the HTTP call: it is turning arbitrarily
//! nested, heterogeneously shaped JSON records into flat rows whose column
//! set is discovered incrementally as records stream in, and producing one
//! schema-consistent CSV per table without knowing the final column set in
//! advance.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use lever_extractor::{Config, Extractor, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_file("config.json")?;
//!     let stats = Extractor::new(config, "out/tables")?.run().await?;
//!     println!("{} records extracted", stats.records_extracted);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PageStream ──▶ flatten_record ──▶ TableWriter (per table)
//!     ▲                                  │
//!     │          Extractor               ▼
//!     └── drives per endpoint, fans  finalize():
//!         out child fetches for      header + padded rows
//!         opportunities              + manifest
//! ```
//!
//! Data flows one direction, fully sequentially: one endpoint, one page,
//! one record at a time. Child fetches for an opportunity complete before
//! the next opportunity is touched.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the extractor
pub mod error;

/// Extraction configuration
pub mod config;

/// HTTP transport with retry and backoff
pub mod http;

/// Lever API client and pagination
pub mod api;

/// Recursive JSON flattening
pub mod flatten;

/// CSV table output with dynamic schemas
pub mod output;

/// Extraction orchestrator
pub mod extractor;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Config;
pub use error::{Error, Result};
pub use extractor::{Endpoint, Extractor, RunStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
