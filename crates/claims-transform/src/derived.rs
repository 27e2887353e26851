//! Fields derived from cleaned values.

use chrono::NaiveDate;
use tracing::debug;

/// Days between admission and discharge.
///
/// Zero when either date is missing. A discharge before admission yields a
/// negative value; it is passed through rather than clamped.
pub fn length_of_stay(admitted: Option<NaiveDate>, discharged: Option<NaiveDate>) -> i64 {
    let (Some(admitted), Some(discharged)) = (admitted, discharged) else {
        return 0;
    };
    let days = discharged.signed_duration_since(admitted).num_days();
    if days < 0 {
        debug!(%admitted, %discharged, days, "discharge precedes admission");
    }
    days
}

/// Grouping key for a diagnosis: trimmed and upper-cased, `""` when missing.
pub fn canonicalize_diagnosis(raw: Option<&str>) -> String {
    raw.map(|value| value.trim().to_uppercase())
        .unwrap_or_default()
}
