//! The single rounding policy shared by every analytics output.
//!
//! Stock quantities round up, forecast quantities round to the nearest unit,
//! percentages round to two decimals.

/// Float noise tolerated before rounding a quantity up.
pub const CEIL_TOLERANCE: f64 = 1e-9;

/// Round a stock quantity up to whole units, floored at zero.
///
/// Values within [`CEIL_TOLERANCE`] of an integer snap to it, so that
/// algebraically exact results (e.g. `z·(s/z)`) do not gain a unit.
pub fn ceil_units(x: f64) -> u64 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    (x - CEIL_TOLERANCE).ceil().max(0.0) as u64
}

/// Round a forecast quantity to the nearest whole unit, floored at zero.
pub fn round_units(x: f64) -> u64 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    x.round() as u64
}

/// Round a percentage to two decimals.
pub fn round_percent(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_snaps_float_noise() {
        assert_eq!(ceil_units(100.000_000_000_01), 100);
        assert_eq!(ceil_units(100.01), 101);
        assert_eq!(ceil_units(0.2), 1);
        assert_eq!(ceil_units(-3.0), 0);
        assert_eq!(ceil_units(f64::NAN), 0);
    }

    #[test]
    fn round_units_is_half_away_from_zero() {
        assert_eq!(round_units(119.5), 120);
        assert_eq!(round_units(119.49), 119);
        assert_eq!(round_units(-1.0), 0);
    }

    #[test]
    fn percentages_keep_two_decimals() {
        assert_eq!(round_percent(21.428_571), 21.43);
        assert_eq!(round_percent(40.0), 40.0);
    }
}
