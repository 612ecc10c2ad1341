// ---------------------------------------------------------------------------
// Text → number coercion
// ---------------------------------------------------------------------------
//
// Unparseable input never fails: it becomes a missing value, the same way
// `to_numeric(errors="coerce")` turns garbage into NaN.

/// Parse `text` as a finite float. Empty, non-numeric and non-finite input
/// (`NaN`, `inf`) all map to `None`.
pub fn coerce_numeric(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse `text` as an integer. Integral floats such as `"12.0"` are accepted.
pub fn coerce_integer(text: &str) -> Option<i64> {
    let t = text.trim();
    if let Ok(i) = t.parse::<i64>() {
        return Some(i);
    }
    coerce_numeric(t)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_integers_are_unchanged() {
        for n in [0_i64, 1, 12, 24, 1787] {
            assert_eq!(coerce_numeric(&n.to_string()), Some(n as f64));
        }
        assert_eq!(coerce_numeric(" 26 "), Some(26.0));
    }

    #[test]
    fn non_numeric_text_is_missing() {
        for garbage in ["Unknown", "", "   ", "12 eps", "N/A", "NaN", "inf", "-inf", "1,000"] {
            assert_eq!(coerce_numeric(garbage), None, "input {garbage:?}");
        }
    }

    #[test]
    fn integer_coercion_accepts_integral_floats_only() {
        assert_eq!(coerce_integer("200630"), Some(200630));
        assert_eq!(coerce_integer("12.0"), Some(12));
        assert_eq!(coerce_integer("12.5"), None);
        assert_eq!(coerce_integer("many"), None);
        assert_eq!(coerce_integer(""), None);
    }
}
