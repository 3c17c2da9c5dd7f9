//! Interval value type and the affine remap between intervals.

use crate::errors::StatsError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Closed-open interval `[left, left + width)`.
///
/// Used both as the domain periodic data folds into and as the domain a
/// linear quantity occupies when remapping it onto another interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    left: f64,
    width: f64,
}

/// The domain circular statistics are computed in.
pub const CANONICAL: Interval = Interval {
    left: -PI,
    width: 2.0 * PI,
};

impl Interval {
    /// Create the interval `[lo, hi)`.
    ///
    /// # Errors
    /// Returns [`StatsError::InvalidInterval`] if either endpoint is NaN or
    /// if `hi < lo`.
    pub fn new(lo: f64, hi: f64) -> Result<Self, StatsError> {
        let width = hi - lo;
        if lo.is_nan() || hi.is_nan() || width.is_nan() || width < 0.0 {
            return Err(StatsError::InvalidInterval { left: lo, width });
        }
        Ok(Self { left: lo, width })
    }

    pub(crate) fn from_left_width(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Map `x` into `[left, left + width)` by a floored modulo on `x - left`.
    pub fn mod_into(&self, x: f64) -> f64 {
        self.left + floored_mod(x - self.left, self.width)
    }

    /// Ensure the interval can act as a period.
    pub(crate) fn check_period(&self) -> Result<(), StatsError> {
        if self.width > 0.0 && self.width.is_finite() && self.left.is_finite() {
            Ok(())
        } else {
            Err(StatsError::InvalidInterval {
                left: self.left,
                width: self.width,
            })
        }
    }
}

/// Affine map sending `from` onto `to`.
///
/// `shift_range(shift_range(x, a, b), b, a)` recovers `x` up to rounding.
pub fn shift_range(x: f64, from: Interval, to: Interval) -> f64 {
    (x - from.left) / from.width * to.width + to.left
}

/// Floored modulo for a positive period, never returning `period` itself.
pub(crate) fn floored_mod(x: f64, period: f64) -> f64 {
    let r = x.rem_euclid(period);
    // rem_euclid rounds up to `period` for tiny negative x.
    if r >= period { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_reversed_and_nan_endpoints() {
        assert!(Interval::new(1.0, 0.0).is_err());
        assert!(Interval::new(f64::NAN, 0.0).is_err());
        assert!(Interval::new(0.0, f64::NAN).is_err());
        assert!(Interval::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn accessors() {
        let int = Interval::new(-180.0, 180.0).unwrap();
        assert_eq!(int.left(), -180.0);
        assert_eq!(int.right(), 180.0);
        assert_eq!(int.width(), 360.0);
    }

    #[test]
    fn mod_into_folds_half_open() {
        let int = Interval::new(-180.0, 180.0).unwrap();
        assert_relative_eq!(int.mod_into(200.0), -160.0);
        assert_relative_eq!(int.mod_into(-200.0), 160.0);
        assert_relative_eq!(int.mod_into(180.0), -180.0);
        assert_relative_eq!(int.mod_into(-180.0), -180.0);
        assert_relative_eq!(int.mod_into(540.0), -180.0);
        assert!(int.mod_into(-1e-300 - 180.0) < 180.0);
    }

    #[test]
    fn shift_range_maps_linear_quantities() {
        let from = Interval::new(1.0, 2.0).unwrap();
        let to = Interval::new(20.0, 30.0).unwrap();
        assert_relative_eq!(shift_range(1.0, from, to), 20.0);
        assert_relative_eq!(shift_range(1.5, from, to), 25.0);
        assert_relative_eq!(shift_range(3.0, from, to), 40.0);
        assert_relative_eq!(shift_range(25.0, to, from), 1.5);
    }

    #[test]
    fn shift_range_round_trips() {
        let deg = Interval::new(0.0, 360.0).unwrap();
        for x in [-725.0, -1.0, 0.0, 33.3, 359.9, 1000.0] {
            let y = shift_range(x, deg, CANONICAL);
            assert_relative_eq!(shift_range(y, CANONICAL, deg), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_width_is_not_a_period() {
        let int = Interval::new(2.0, 2.0).unwrap();
        assert_eq!(
            int.check_period(),
            Err(StatsError::InvalidInterval {
                left: 2.0,
                width: 0.0
            })
        );
        assert!(CANONICAL.check_period().is_ok());
    }
}
