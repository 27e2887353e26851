//! Fraud risk categories.
//!
//! Scores are bucketed into three categories. The store persists the
//! category as its display string, so `as_str` and `FromStr` must stay in
//! sync.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Highest score the engine can emit.
pub const MAX_FRAUD_SCORE: u8 = 100;

/// Fraud risk bucket derived from a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FraudCategory {
    /// Score of 25 or below.
    Low,
    /// Score between 26 and 75 inclusive.
    Medium,
    /// Score above 75.
    High,
}

impl FraudCategory {
    /// All categories in ascending risk order.
    pub const ALL: [FraudCategory; 3] = [
        FraudCategory::Low,
        FraudCategory::Medium,
        FraudCategory::High,
    ];

    /// Returns the canonical name as it is stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            FraudCategory::Low => "Low",
            FraudCategory::Medium => "Medium",
            FraudCategory::High => "High",
        }
    }
}

impl fmt::Display for FraudCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FraudCategory {
    type Err = ModelError;

    /// Parse a category name (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "LOW" => Ok(FraudCategory::Low),
            "MEDIUM" => Ok(FraudCategory::Medium),
            "HIGH" => Ok(FraudCategory::High),
            _ => Err(ModelError::UnknownCategory(s.to_string())),
        }
    }
}

/// Convert a stored integer score into the engine's score type.
pub fn score_from_i64(value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|score| *score <= MAX_FRAUD_SCORE)
        .ok_or(ModelError::ScoreOutOfRange(value))
}
