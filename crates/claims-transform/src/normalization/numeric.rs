//! Numeric normalization utilities.

use tracing::warn;

/// Characters stripped from amount strings before parsing.
const AMOUNT_NOISE: [char; 5] = [',', '₦', '$', '€', '£'];

/// Cleans a billed amount string into a number.
///
/// Thousands separators and currency symbols are removed before parsing.
/// Blank input is `None`; anything that still fails to parse (or parses to
/// a non-finite value) is logged and also `None`.
pub fn clean_amount(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let stripped: String = raw.chars().filter(|ch| !AMOUNT_NOISE.contains(ch)).collect();
    match stripped.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(value = %raw, "unclean amount value encountered");
            None
        }
    }
}

/// Parses an age cell, accepting integer or decimal text.
pub fn parse_age(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(age) = trimmed.parse::<i64>() {
        return Some(age);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|age| age.is_finite())
        .map(|age| age.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_symbols() {
        assert_eq!(clean_amount(Some("1,250.50")), Some(1250.5));
        assert_eq!(clean_amount(Some("₦45,000")), Some(45_000.0));
        assert_eq!(clean_amount(Some(" $ 300 ")), Some(300.0));
        assert_eq!(clean_amount(Some("£1,000,000")), Some(1_000_000.0));
    }

    #[test]
    fn unparseable_amounts_are_none() {
        assert_eq!(clean_amount(Some("N/A")), None);
        assert_eq!(clean_amount(Some("12abc")), None);
        assert_eq!(clean_amount(Some("nan")), None);
        assert_eq!(clean_amount(Some("inf")), None);
    }

    #[test]
    fn missing_amounts_are_none() {
        assert_eq!(clean_amount(None), None);
        assert_eq!(clean_amount(Some("")), None);
        assert_eq!(clean_amount(Some("   ")), None);
    }

    #[test]
    fn negative_amounts_parse() {
        assert_eq!(clean_amount(Some("-500")), Some(-500.0));
    }

    #[test]
    fn age_accepts_decimal_text() {
        assert_eq!(parse_age(Some("42")), Some(42));
        assert_eq!(parse_age(Some("42.0")), Some(42));
        assert_eq!(parse_age(Some("forty")), None);
        assert_eq!(parse_age(None), None);
    }
}
