//! Extraction configuration
//!
//! Typed view of the JSON configuration file: API credential, selected
//! endpoints, sync options (date range plus static filters), and the
//! destination load mode. Validation happens before any network activity.

use crate::error::{Error, Result};
use crate::extractor::Endpoint;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Complete extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API credential
    pub authentication: Credentials,

    /// Endpoints to extract, in order
    pub endpoints: Vec<Endpoint>,

    /// Date range and static filters
    #[serde(default)]
    pub sync_options: SyncOptions,

    /// Destination-side load semantics
    #[serde(default)]
    pub destination: Destination,
}

/// API credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Lever API token, sent as the basic-auth username with empty password
    #[serde(default, alias = "#token")]
    pub token: String,
}

/// Date range and additional static filters applied to every endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Range start, RFC 3339 or `YYYY-MM-DD`; empty = no range filter
    #[serde(default)]
    pub start_date: String,

    /// Range end, same formats as `start_date`
    #[serde(default)]
    pub end_date: String,

    /// Extra query parameters merged into every paginated request;
    /// empty values are skipped
    #[serde(default)]
    pub additional_filters: HashMap<String, String>,
}

impl SyncOptions {
    /// Parse the configured date range
    ///
    /// The filter only applies when both bounds are present, so a single
    /// configured bound yields `None`.
    pub fn date_range(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        if self.start_date.is_empty() || self.end_date.is_empty() {
            return Ok(None);
        }
        let start = parse_date("sync_options.start_date", &self.start_date)?;
        let end = parse_date("sync_options.end_date", &self.end_date)?;
        Ok(Some((start, end)))
    }
}

/// Destination-side load semantics; never affects extraction logic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Destination {
    /// Full or incremental load
    #[serde(default)]
    pub load_type: LoadType,
}

/// How the destination merges the produced tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadType {
    /// Replace the destination table
    FullLoad,
    /// Merge by primary key
    #[default]
    IncrementalLoad,
}

impl LoadType {
    /// Whether the destination merges incrementally
    pub fn is_incremental(&self) -> bool {
        matches!(self, LoadType::IncrementalLoad)
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Load configuration from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Validate the configuration; fails before any network activity
    pub fn validate(&self) -> Result<()> {
        if self.authentication.token.is_empty() {
            return Err(Error::missing_field("authentication.token"));
        }
        if self.endpoints.is_empty() {
            return Err(Error::config("no endpoints selected"));
        }
        // Surface malformed dates here rather than mid-extraction
        self.sync_options.date_range()?;
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp or a plain date at UTC midnight
fn parse_date(field: &str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0)
                .ok_or_else(|| Error::invalid_value(field, "invalid date"))?,
            Utc,
        ));
    }
    Err(Error::invalid_value(
        field,
        format!("'{value}' is not an RFC 3339 timestamp or YYYY-MM-DD date"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn full_config_json() -> &'static str {
        r##"{
            "authentication": {"#token": "secret"},
            "endpoints": ["opportunities", "requisitions"],
            "sync_options": {
                "start_date": "2024-01-01",
                "end_date": "2024-02-01",
                "additional_filters": {"tag": "engineering"}
            },
            "destination": {"load_type": "full_load"}
        }"##
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_str(full_config_json()).unwrap();
        assert_eq!(config.authentication.token, "secret");
        assert_eq!(
            config.endpoints,
            vec![Endpoint::Opportunities, Endpoint::Requisitions]
        );
        assert_eq!(
            config.sync_options.additional_filters.get("tag"),
            Some(&"engineering".to_string())
        );
        assert_eq!(config.destination.load_type, LoadType::FullLoad);
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_str(
            r#"{"authentication": {"token": "t"}, "endpoints": ["postings"]}"#,
        )
        .unwrap();
        assert_eq!(config.sync_options.start_date, "");
        assert!(config.sync_options.additional_filters.is_empty());
        assert_eq!(config.destination.load_type, LoadType::IncrementalLoad);
        assert!(config.destination.load_type.is_incremental());
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let result = Config::from_str(
            r#"{"authentication": {"token": "t"}, "endpoints": ["interviews"]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let config = Config::from_str(
            r#"{"authentication": {}, "endpoints": ["postings"]}"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_empty_endpoints_fails_validation() {
        let config =
            Config::from_str(r#"{"authentication": {"token": "t"}, "endpoints": []}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_date_range_both_bounds() {
        let options = SyncOptions {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-02T12:30:00Z".to_string(),
            ..Default::default()
        };
        let (start, end) = options.date_range().unwrap().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 2, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        let options = SyncOptions {
            start_date: "2024-01-01".to_string(),
            ..Default::default()
        };
        assert!(options.date_range().unwrap().is_none());
    }

    #[test]
    fn test_invalid_date_is_config_error() {
        let options = SyncOptions {
            start_date: "yesterday".to_string(),
            end_date: "2024-01-02".to_string(),
            ..Default::default()
        };
        let err = options.date_range().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }
}
