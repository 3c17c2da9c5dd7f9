//! Linear (non-circular) reference statistics.

use crate::errors::StatsError;
use std::cmp::Ordering;

/// Running mean and sample standard deviation (Welford's algorithm).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug)]
pub struct AccumulatorReport {
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn n_vals(&self) -> usize {
        self.n_vals
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic mean.
pub fn mean(vals: &[f64]) -> Result<f64, StatsError> {
    if vals.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    Ok(vals.iter().sum::<f64>() / vals.len() as f64)
}

/// Sample standard deviation (denominator `n - 1`); NaN for a single value.
pub fn std_dev(vals: &[f64]) -> Result<f64, StatsError> {
    if vals.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let mut acc = Accumulator::new();
    vals.iter().for_each(|&val| acc.add(val));
    Ok(acc.report().std_dev)
}

/// Median, averaging the two middle values for even lengths.
///
/// Any NaN in `vals` makes the result NaN.
pub fn median(vals: &[f64]) -> Result<f64, StatsError> {
    if vals.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if vals.iter().any(|val| val.is_nan()) {
        return Ok(f64::NAN);
    }
    let mut buf = vals.to_vec();
    Ok(median_in_place(&mut buf))
}

/// Median absolute deviation from the median, without a consistency factor.
pub fn mad(vals: &[f64]) -> Result<f64, StatsError> {
    let med = median(vals)?;
    let abs_devs: Vec<_> = vals.iter().map(|val| (val - med).abs()).collect();
    median(&abs_devs)
}

/// Quickselect median of a non-empty, NaN-free buffer.
fn median_in_place(buf: &mut [f64]) -> f64 {
    let n_vals = buf.len();
    let mid = n_vals / 2;
    let cmp = |a: &f64, b: &f64| a.partial_cmp(b).unwrap_or(Ordering::Equal);

    let (lower, &mut upper, _) = buf.select_nth_unstable_by(mid, cmp);
    if n_vals % 2 == 1 {
        return upper;
    }
    let lower = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lower + upper) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn accumulator_matches_two_pass() {
        let vals = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut acc = Accumulator::new();
        vals.iter().for_each(|&val| acc.add(val));
        let report = acc.report();
        assert_eq!(acc.n_vals(), 8);
        assert_relative_eq!(report.mean, 5.0);
        assert_relative_eq!(report.std_dev, (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn accumulator_needs_two_values_for_spread() {
        let mut acc = Accumulator::default();
        assert!(acc.report().mean.is_nan());
        acc.add(3.0);
        assert_eq!(acc.report().mean, 3.0);
        assert!(acc.report().std_dev.is_nan());
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[5.0, 1.0, 3.0]).unwrap(), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
        assert_eq!(median(&[-3.0, 0.0, 0.0, 1.0, 2.0, 5.0, 10.0]).unwrap(), 1.0);
    }

    #[test]
    fn median_propagates_nan() {
        assert!(median(&[1.0, f64::NAN, 3.0]).unwrap().is_nan());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(mean(&[]), Err(StatsError::EmptyInput));
        assert_eq!(std_dev(&[]), Err(StatsError::EmptyInput));
        assert_eq!(median(&[]), Err(StatsError::EmptyInput));
        assert_eq!(mad(&[]), Err(StatsError::EmptyInput));
    }

    #[test]
    fn mad_is_unnormalized() {
        // median 3, deviations [2, 1, 0, 1, 97] -> median 1
        assert_relative_eq!(mad(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap(), 1.0);
    }
}
