//! Endpoint and run-statistics types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column injected into every child-resource row, holding the parent id
pub const PARENT_ID_COLUMN: &str = "opportunity_id";

/// Top-level Lever resource collections this extractor supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Candidate opportunities; fans out into resumes and applications
    Opportunities,
    /// Job postings
    Postings,
    /// Requisitions
    Requisitions,
}

impl Endpoint {
    /// All supported endpoints
    pub const ALL: [Endpoint; 3] = [
        Endpoint::Opportunities,
        Endpoint::Postings,
        Endpoint::Requisitions,
    ];

    /// API path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Opportunities => "opportunities",
            Endpoint::Postings => "postings",
            Endpoint::Requisitions => "requisitions",
        }
    }

    /// Destination table name (same as the path segment)
    pub fn table_name(&self) -> &'static str {
        self.as_str()
    }

    /// Field the date-range filter applies to, as `{field}_start`/`{field}_end`
    pub fn date_filter_field(&self) -> &'static str {
        match self {
            Endpoint::Opportunities | Endpoint::Postings => "updated_at",
            Endpoint::Requisitions => "created_at",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-opportunity child collections, fetched without pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildResource {
    Resumes,
    Applications,
}

impl ChildResource {
    /// All child resources fetched per opportunity
    pub const ALL: [ChildResource; 2] = [ChildResource::Resumes, ChildResource::Applications];

    /// Destination table name
    pub fn table_name(&self) -> &'static str {
        match self {
            ChildResource::Resumes => "resumes",
            ChildResource::Applications => "applications",
        }
    }

    /// API path for one parent opportunity
    pub fn path(&self, opportunity_id: &str) -> String {
        format!("opportunities/{opportunity_id}/{}", self.table_name())
    }
}

/// Statistics for one extraction run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Records written across all tables, children included
    pub records_extracted: usize,
    /// Pages fetched from paginated endpoints
    pub pages_fetched: usize,
    /// Child-resource requests issued
    pub child_requests: usize,
    /// Tables finalized at end of run
    pub tables_finalized: usize,
    /// Wall-clock duration
    pub duration_ms: u64,
}

impl RunStats {
    /// Record one extracted record
    pub fn add_record(&mut self) {
        self.records_extracted += 1;
    }

    /// Record one fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Record one child-resource request
    pub fn add_child_request(&mut self) {
        self.child_requests += 1;
    }

    /// Record one finalized table
    pub fn add_table(&mut self) {
        self.tables_finalized += 1;
    }

    /// Set the run duration
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }
}
