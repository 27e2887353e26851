//! Fraud score heuristic.
//!
//! The score combines how far a claim's amount sits above its diagnosis
//! baseline with bonuses for suspicious stay lengths and large amounts.
//! Every function here is pure and total.

use claims_model::{FraudCategory, MAX_FRAUD_SCORE};

/// Cap on the ratio-driven part of the score.
const RATIO_CAP: f64 = 60.0;
/// Points per unit of amount/baseline ratio.
const RATIO_WEIGHT: f64 = 20.0;
/// Bonus for a same-day (or undated) stay.
const SAME_DAY_BONUS: i64 = 10;
/// Stays longer than this many days earn the long-stay bonus.
const LONG_STAY_DAYS: i64 = 30;
const LONG_STAY_BONUS: i64 = 10;
const HIGH_AMOUNT: f64 = 10_000.0;
const HIGH_AMOUNT_BONUS: i64 = 10;
const ELEVATED_AMOUNT: f64 = 5_000.0;
const ELEVATED_AMOUNT_BONUS: i64 = 5;
/// Highest score still categorized as low risk.
const LOW_CEILING: u8 = 25;
/// Highest score still categorized as medium risk.
const MEDIUM_CEILING: u8 = 75;

/// Scores a claim on a 0-100 scale.
///
/// A missing amount counts as zero. Without a usable baseline (missing,
/// zero, NaN, or negative) the ratio defaults to 1.
pub fn score(amount: Option<f64>, diagnosis_baseline: Option<f64>, length_of_stay: i64) -> u8 {
    let amount = amount.unwrap_or(0.0);
    let ratio = match diagnosis_baseline {
        Some(baseline) if baseline > 0.0 => amount / baseline,
        _ => 1.0,
    };

    // f64::min returns the cap for a NaN ratio; `as` truncates toward zero.
    let mut total = (ratio * RATIO_WEIGHT).min(RATIO_CAP) as i64;

    if length_of_stay == 0 {
        total += SAME_DAY_BONUS;
    }
    if length_of_stay > LONG_STAY_DAYS {
        total += LONG_STAY_BONUS;
    }
    if amount >= HIGH_AMOUNT {
        total += HIGH_AMOUNT_BONUS;
    } else if amount >= ELEVATED_AMOUNT {
        total += ELEVATED_AMOUNT_BONUS;
    }

    total.clamp(0, i64::from(MAX_FRAUD_SCORE)) as u8
}

/// Buckets a score into a risk category.
pub fn categorize(score: u8) -> FraudCategory {
    if score <= LOW_CEILING {
        FraudCategory::Low
    } else if score <= MEDIUM_CEILING {
        FraudCategory::Medium
    } else {
        FraudCategory::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_baseline_without_bonuses() {
        assert_eq!(score(Some(1000.0), Some(2000.0), 1), 10);
    }

    #[test]
    fn capped_ratio_with_same_day_and_high_amount() {
        assert_eq!(score(Some(20_000.0), Some(2000.0), 0), 80);
    }

    #[test]
    fn long_stay_without_amount_tier() {
        assert_eq!(score(Some(3000.0), Some(3000.0), 40), 30);
    }

    #[test]
    fn elevated_amount_tier() {
        // ratio 1 -> 20, +5 for 5000 <= amount < 10000
        assert_eq!(score(Some(6000.0), Some(6000.0), 3), 25);
        assert_eq!(score(Some(9999.99), Some(9999.99), 3), 25);
        assert_eq!(score(Some(10_000.0), Some(10_000.0), 3), 30);
    }

    #[test]
    fn ratio_is_truncated_not_rounded() {
        // 1999 / 2000 * 20 = 19.99
        assert_eq!(score(Some(1999.0), Some(2000.0), 5), 19);
    }

    #[test]
    fn unusable_baseline_defaults_ratio_to_one() {
        assert_eq!(score(Some(100.0), None, 5), 20);
        assert_eq!(score(Some(100.0), Some(0.0), 5), 20);
        assert_eq!(score(Some(100.0), Some(f64::NAN), 5), 20);
        assert_eq!(score(Some(100.0), Some(-50.0), 5), 20);
    }

    #[test]
    fn missing_amount_counts_as_zero() {
        assert_eq!(score(None, Some(1000.0), 5), 0);
        assert_eq!(score(None, None, 5), 20);
        assert_eq!(score(None, Some(1000.0), 0), 10);
    }

    #[test]
    fn negative_stay_earns_no_bonus() {
        assert_eq!(score(Some(1000.0), Some(1000.0), -4), 20);
    }

    #[test]
    fn negative_ratio_truncates_toward_zero_then_clamps() {
        // -0.5 * 20 = -10 -> clamped to 0
        assert_eq!(score(Some(-500.0), Some(1000.0), 5), 0);
        // -0.01 * 20 = -0.2 -> truncates to 0, then same-day bonus
        assert_eq!(score(Some(-10.0), Some(1000.0), 0), 10);
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(categorize(0), FraudCategory::Low);
        assert_eq!(categorize(25), FraudCategory::Low);
        assert_eq!(categorize(26), FraudCategory::Medium);
        assert_eq!(categorize(75), FraudCategory::Medium);
        assert_eq!(categorize(76), FraudCategory::High);
        assert_eq!(categorize(100), FraudCategory::High);
    }
}
