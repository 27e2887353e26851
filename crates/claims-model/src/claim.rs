//! Claim records at each stage of ingestion.
//!
//! A claim starts as a [`RawClaimRecord`] (text cells straight from the
//! input file), becomes a [`CleanedClaim`] once fields are parsed and
//! derived, and ends as a [`ScoredClaim`] after the baseline lookup and
//! scoring.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::FraudCategory;

/// One input row, mapped onto the logical claim fields.
///
/// A cell is `None` when its column is absent from the file or the cell
/// is null in the loaded table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawClaimRecord {
    pub sn: Option<String>,
    pub gender: Option<String>,
    pub diagnosis: Option<String>,
    pub age: Option<String>,
    pub amount: Option<String>,
    pub date_admitted: Option<String>,
    pub date_discharged: Option<String>,
}

/// A claim with parsed fields and derived stay length and diagnosis key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedClaim {
    /// Serial id from the source file (empty when absent).
    pub sn: String,
    pub gender: Option<String>,
    /// Diagnosis text as it appeared in the source.
    pub diagnosis: Option<String>,
    pub age: Option<i64>,
    pub amount: Option<f64>,
    pub date_admitted: Option<NaiveDate>,
    pub date_discharged: Option<NaiveDate>,
    /// Days between admission and discharge. Zero when either date is
    /// missing; negative when discharge precedes admission.
    pub length_of_stay: i64,
    /// Trimmed, upper-cased diagnosis. Never null.
    pub diagnosis_canonical: String,
}

impl CleanedClaim {
    /// Admission date as `YYYY-MM-DD`, or an empty string.
    pub fn date_admitted_iso(&self) -> String {
        format_iso_date(self.date_admitted)
    }

    /// Discharge date as `YYYY-MM-DD`, or an empty string.
    pub fn date_discharged_iso(&self) -> String {
        format_iso_date(self.date_discharged)
    }
}

/// A cleaned claim enriched with its diagnosis baseline and fraud score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredClaim {
    #[serde(flatten)]
    pub claim: CleanedClaim,
    /// Mean amount of the claim's diagnosis group, when one exists.
    pub diag_avg: Option<f64>,
    pub fraud_score: u8,
    pub fraud_category: FraudCategory,
}

/// Formats an optional date the way the store expects it.
pub fn format_iso_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
