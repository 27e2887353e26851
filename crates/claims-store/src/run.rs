//! Metadata describing the most recent ingestion run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the live claims table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRun {
    /// Input file as given to the pipeline.
    pub source_path: String,
    /// SHA-256 of the input file, lowercase hex.
    pub source_sha256: String,
    pub row_count: u64,
    pub loaded_at: DateTime<Utc>,
}

impl IngestRun {
    /// Creates run metadata stamped with the current time.
    pub fn new(source_path: impl Into<String>, source_sha256: impl Into<String>, row_count: u64) -> Self {
        Self {
            source_path: source_path.into(),
            source_sha256: source_sha256.into(),
            row_count,
            loaded_at: Utc::now(),
        }
    }

    /// True when `digest` matches the digest recorded for this run.
    pub fn matches_digest(&self, digest: &str) -> bool {
        self.source_sha256.eq_ignore_ascii_case(digest)
    }
}
