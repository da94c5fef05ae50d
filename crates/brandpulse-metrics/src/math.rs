//! Shared arithmetic guards for aggregate math.

/// Divide with an explicit fallback for a zero (or non-finite) denominator.
///
/// Every rate and average in this crate goes through here, so the
/// zero-division invariant holds uniformly: empty inputs produce the
/// fallback, never NaN or infinity.
#[must_use]
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return fallback;
    }
    numerator / denominator
}

/// Round to one decimal place, the presentation precision for all
/// computed rates, applied inside the aggregators so both sides of a
/// brand comparison carry identical granularity.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_divide_normal_case() {
        assert!((safe_divide(10.0, 4.0, 0.0) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn safe_divide_zero_denominator_returns_fallback() {
        assert_eq!(safe_divide(10.0, 0.0, 0.0), 0.0);
        assert_eq!(safe_divide(10.0, 0.0, -1.0), -1.0);
    }

    #[test]
    fn safe_divide_never_yields_nan_or_infinity() {
        let cases = [
            safe_divide(f64::NAN, 2.0, 0.0),
            safe_divide(2.0, f64::NAN, 0.0),
            safe_divide(1.0, 0.0, 0.0),
            safe_divide(f64::INFINITY, 1.0, 0.0),
        ];
        for v in cases {
            assert!(v.is_finite(), "expected finite, got {v}");
        }
    }

    #[test]
    fn round1_rounds_half_away() {
        assert_eq!(round1(10.04), 10.0);
        assert_eq!(round1(10.05), 10.1);
        assert_eq!(round1(0.349), 0.3);
    }
}
