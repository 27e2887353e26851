//! Claim data model shared by ingestion, scoring, and the store.

pub mod category;
pub mod claim;
pub mod error;

pub use category::{FraudCategory, MAX_FRAUD_SCORE, score_from_i64};
pub use claim::{
    CleanedClaim, RawClaimRecord, ScoredClaim, format_iso_date,
};
pub use error::{ModelError, Result};
