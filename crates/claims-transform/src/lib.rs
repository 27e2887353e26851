//! Claim transformation: field cleaning, derived fields, diagnosis
//! baselines, and fraud scoring.
//!
//! - **normalization**: amount, age, and date cleaners
//! - **derived**: length of stay and canonical diagnosis
//! - **baseline**: per-diagnosis mean amounts over a full run
//! - **scoring**: the fraud score heuristic and categories
//! - **record**: row-level helpers combining the above

pub mod baseline;
pub mod derived;
pub mod normalization;
pub mod record;
pub mod scoring;

pub use baseline::{DiagnosisBaselines, compute_baselines};
pub use derived::{canonicalize_diagnosis, length_of_stay};
pub use normalization::{clean_amount, parse_age, parse_date};
pub use record::{CleanOutcome, clean_record, score_claim};
pub use scoring::{categorize, score};
