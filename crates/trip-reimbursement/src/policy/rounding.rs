/// Absorbs binary representation error so that e.g. `100.485` rounds up like its decimal
/// spelling instead of down like its nearest double.
const HALF_CENT_TOLERANCE: f64 = 1e-7;

/// Rounds to cents (half away from zero) and bumps totals ending in `.49` or `.99` by one
/// cent, matching the legacy system's output.
pub fn round_legacy(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    let scaled = value * 100.0;
    let mut cents = (scaled + scaled.signum() * HALF_CENT_TOLERANCE).round();
    if cents == 0.0 {
        return 0.0;
    }
    let trailing = cents.abs().rem_euclid(100.0);
    if trailing == 49.0 || trailing == 99.0 {
        cents += 1.0;
    }
    cents / 100.0
}

/// Formats an amount with exactly two decimals, never printing `-0.00`.
pub fn format_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_cents_away_from_zero() {
        assert_eq!(round_legacy(100.484), 100.48);
        assert_eq!(round_legacy(10.005), 10.01);
        assert_eq!(round_legacy(-10.005), -10.01);
    }

    #[test]
    fn bumps_forty_nine_and_ninety_nine_cents() {
        assert_eq!(round_legacy(100.485), 100.5);
        assert_eq!(round_legacy(12.99), 13.0);
        assert_eq!(round_legacy(0.49), 0.5);
        assert_eq!(round_legacy(-3.49), -3.48);
        assert_eq!(round_legacy(-0.99), -0.98);
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(round_legacy(0.0), 0.0);
        assert_eq!(round_legacy(-0.001), 0.0);
        assert_eq!(format_amount(round_legacy(-0.001)), "0.00");
    }

    #[test]
    fn rounding_is_idempotent() {
        for value in [100.485, 12.99, -3.49, 788.0, 1591.254, 0.005, 1234.5678] {
            let once = round_legacy(value);
            assert_eq!(round_legacy(once), once, "re-rounding {value} changed it");
        }
    }

    #[test]
    fn non_finite_totals_collapse_to_zero() {
        assert_eq!(round_legacy(f64::NAN), 0.0);
        assert_eq!(round_legacy(f64::INFINITY), 0.0);
    }

    #[test]
    fn large_totals_do_not_saturate() {
        assert_eq!(round_legacy(1e17), 1e17);
        assert_eq!(round_legacy(12_345_678_901.49), 12_345_678_901.5);
        let huge = round_legacy(1e300);
        assert!((huge / 1e300 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_amount(1140.0), "1140.00");
        assert_eq!(format_amount(100.5), "100.50");
    }
}
