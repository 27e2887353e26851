//! Row-level cleaning and scoring built from the field cleaners.

use claims_model::{CleanedClaim, RawClaimRecord, ScoredClaim};

use crate::baseline::DiagnosisBaselines;
use crate::derived::{canonicalize_diagnosis, length_of_stay};
use crate::normalization::{clean_amount, parse_age, parse_date};
use crate::scoring::{categorize, score};

/// A cleaned claim plus the field failures seen while cleaning it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub claim: CleanedClaim,
    /// The amount cell had text that could not be parsed.
    pub amount_failed: bool,
    /// Number of date cells (0-2) with text that could not be parsed.
    pub date_failures: u8,
}

/// Cleans one raw row. Unparseable cells degrade to `None`; nothing fails.
pub fn clean_record(raw: &RawClaimRecord) -> CleanOutcome {
    let amount = clean_amount(raw.amount.as_deref());
    let date_admitted = parse_date(raw.date_admitted.as_deref());
    let date_discharged = parse_date(raw.date_discharged.as_deref());

    let amount_failed = has_text(raw.amount.as_deref()) && amount.is_none();
    let date_failures = u8::from(has_text(raw.date_admitted.as_deref()) && date_admitted.is_none())
        + u8::from(has_text(raw.date_discharged.as_deref()) && date_discharged.is_none());

    let claim = CleanedClaim {
        sn: raw.sn.as_deref().map(str::trim).unwrap_or_default().to_string(),
        gender: raw
            .gender
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        diagnosis: raw.diagnosis.clone(),
        age: parse_age(raw.age.as_deref()),
        amount,
        date_admitted,
        date_discharged,
        length_of_stay: length_of_stay(date_admitted, date_discharged),
        diagnosis_canonical: canonicalize_diagnosis(raw.diagnosis.as_deref()),
    };

    CleanOutcome {
        claim,
        amount_failed,
        date_failures,
    }
}

/// Scores a cleaned claim against the run's baselines.
pub fn score_claim(claim: CleanedClaim, baselines: &DiagnosisBaselines) -> ScoredClaim {
    let diag_avg = baselines.get(&claim.diagnosis_canonical).copied();
    let fraud_score = score(claim.amount, diag_avg, claim.length_of_stay);
    ScoredClaim {
        claim,
        diag_avg,
        fraud_score,
        fraud_category: categorize(fraud_score),
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
