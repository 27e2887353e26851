//! Per-diagnosis baseline amounts.

use std::collections::BTreeMap;

use claims_model::CleanedClaim;

/// Mean billed amount keyed by canonical diagnosis.
pub type DiagnosisBaselines = BTreeMap<String, f64>;

/// Computes the mean non-null amount for every diagnosis group.
///
/// Needs the full run's claims. Groups whose amounts are all null are left
/// out of the result entirely.
pub fn compute_baselines(claims: &[CleanedClaim]) -> DiagnosisBaselines {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for claim in claims {
        let Some(amount) = claim.amount else {
            continue;
        };
        let entry = totals
            .entry(claim.diagnosis_canonical.as_str())
            .or_insert((0.0, 0));
        entry.0 += amount;
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(diagnosis, (sum, count))| (diagnosis.to_string(), sum / count as f64))
        .collect()
}
