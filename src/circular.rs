//! Circular statistics.
//!
//! Every statistic is computed on the canonical circle `[-π, π)`. The `_in`
//! variants accept data living on an arbitrary [`Interval`]: samples are
//! remapped onto the canonical circle with [`shift_range`], the statistic is
//! computed there and the result is mapped back. Dispersion measures are
//! scaled by `width / 2π` so they keep the units of the data.

use crate::errors::StatsError;
use crate::interval::{CANONICAL, Interval, floored_mod, shift_range};
use crate::stats;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Inward offset of the boundary vertices inserted by [`wrap_curve_closed`], relative to the width.
const NUDGE_REL: f64 = 1e-10;
/// Margin by which a naive jump must exceed the circular one to count as a wrap, relative to the width.
const WRAP_TOL_REL: f64 = 1e-8;

/// Representative of `x` in `[-π, π)`.
pub fn center_angle(x: f64) -> f64 {
    center_angle_at(x, 0.0, TAU)
}

/// Representative of `x` in `[at - period/2, at + period/2)`.
pub fn center_angle_at(x: f64, at: f64, period: f64) -> f64 {
    let half = period / 2.0;
    floored_mod(x - at + half, period) + at - half
}

/// Fold `x` into `interval`.
pub fn to_range(x: f64, interval: Interval) -> f64 {
    interval.mod_into(x)
}

/// Shortest arc length between two angles, in `[0, π]`.
pub fn distance(x: f64, y: f64) -> f64 {
    distance_with_period(x, y, TAU)
}

/// Shortest arc length between two points of a circle of circumference `period`.
pub fn distance_with_period(x: f64, y: f64, period: f64) -> f64 {
    center_angle_at(x - y, 0.0, period).abs()
}

/// Sum of the unit vectors `e^(i·x)`.
pub fn resultant_vector(x: &[f64]) -> Complex64 {
    x.iter().map(|&ang| Complex64::cis(ang)).sum()
}

pub fn resultant_length(x: &[f64]) -> f64 {
    resultant_vector(x).norm()
}

pub fn resultant_mean_vector(x: &[f64]) -> Result<Complex64, StatsError> {
    check_non_empty(x)?;
    Ok(resultant_vector(x) / x.len() as f64)
}

/// Mean resultant length, in `[0, 1]`.
pub fn resultant_mean_length(x: &[f64]) -> Result<f64, StatsError> {
    resultant_mean_vector(x).map(|vec| vec.norm())
}

/// Circular mean, in `(-π, π]`.
///
/// # Errors
/// Returns [`StatsError::EmptyInput`] for an empty sample. A NaN sample
/// yields a NaN mean.
pub fn mean(x: &[f64]) -> Result<f64, StatsError> {
    check_non_empty(x)?;
    Ok(resultant_vector(x).arg())
}

/// Circular mean of data living on `interval`.
pub fn mean_in(x: &[f64], interval: Interval) -> Result<f64, StatsError> {
    let canon = to_canonical(x, interval)?;
    let avg = mean(&canon)?;
    Ok(shift_range(avg, CANONICAL, interval))
}

/// Circular variance `1 - R̄`, in `[0, 1]`.
pub fn var(x: &[f64]) -> Result<f64, StatsError> {
    Ok(1.0 - resultant_mean_length(x)?)
}

pub fn var_in(x: &[f64], interval: Interval) -> Result<f64, StatsError> {
    var(&to_canonical(x, interval)?)
}

/// Circular standard deviation `sqrt(-2 ln R̄)`.
///
/// Approaches the linear standard deviation (population form) as the spread
/// goes to zero.
pub fn std_dev(x: &[f64]) -> Result<f64, StatsError> {
    let len = resultant_mean_length(x)?;
    // R̄ may exceed 1 by rounding; NaN must still fall through.
    let arg = -2.0 * len.ln();
    Ok(if arg < 0.0 { 0.0 } else { arg.sqrt() })
}

pub fn std_dev_in(x: &[f64], interval: Interval) -> Result<f64, StatsError> {
    Ok(std_dev(&to_canonical(x, interval)?)? * interval.width() / TAU)
}

/// Circular median: the sample minimizing the summed arc distance to all others.
///
/// The result is always an element of `x`. When several elements are equally
/// optimal the first one in input order is returned, so the choice depends on
/// the order of the sample. Non-finite samples make the result NaN.
///
/// # Errors
/// Returns [`StatsError::EmptyInput`] for an empty sample.
pub fn median(x: &[f64]) -> Result<f64, StatsError> {
    check_non_empty(x)?;
    if has_non_finite(x) {
        return Ok(f64::NAN);
    }
    Ok(x[medoid_index(x)])
}

/// Circular median of data living on `interval`.
///
/// Returns the selected element of `x` itself, not its folded image.
pub fn median_in(x: &[f64], interval: Interval) -> Result<f64, StatsError> {
    let canon = to_canonical(x, interval)?;
    check_non_empty(&canon)?;
    if has_non_finite(&canon) {
        return Ok(f64::NAN);
    }
    Ok(x[medoid_index(&canon)])
}

/// Median absolute arc deviation from the circular median.
pub fn mad(x: &[f64]) -> Result<f64, StatsError> {
    let med = median(x)?;
    let abs_devs: Vec<_> = x.iter().map(|&ang| center_angle(ang - med).abs()).collect();
    stats::median(&abs_devs)
}

pub fn mad_in(x: &[f64], interval: Interval) -> Result<f64, StatsError> {
    Ok(mad(&to_canonical(x, interval)?)? * interval.width() / TAU)
}

/// Length of the shortest arc containing every sample.
pub fn sample_range(x: &[f64]) -> Result<f64, StatsError> {
    sample_interval(x).map(|int| int.width())
}

pub fn sample_range_in(x: &[f64], interval: Interval) -> Result<f64, StatsError> {
    sample_interval_in(x, interval).map(|int| int.width())
}

/// Shortest arc containing every sample, as the complement of the largest gap.
///
/// The left endpoint is the folded sample following the largest gap, so the
/// right endpoint may exceed π. Ties between gaps go to the wrap-around gap,
/// then to the lowest gap in sorted order. Non-finite samples make both
/// endpoints NaN.
pub fn sample_interval(x: &[f64]) -> Result<Interval, StatsError> {
    check_non_empty(x)?;
    if has_non_finite(x) {
        return Ok(Interval::from_left_width(f64::NAN, f64::NAN));
    }

    let mut folded: Vec<_> = x.iter().map(|&ang| center_angle(ang)).collect();
    folded.sort_by(f64::total_cmp);

    let first = folded[0];
    let last = folded[folded.len() - 1];
    let mut max_gap = first + TAU - last;
    let (mut left, mut right) = (first, last);
    for pair in folded.windows(2) {
        let gap = pair[1] - pair[0];
        if gap > max_gap {
            max_gap = gap;
            (left, right) = (pair[1], pair[0] + TAU);
        }
    }

    Ok(Interval::from_left_width(left, right - left))
}

pub fn sample_interval_in(x: &[f64], interval: Interval) -> Result<Interval, StatsError> {
    let canon = sample_interval(&to_canonical(x, interval)?)?;
    Ok(Interval::from_left_width(
        shift_range(canon.left(), CANONICAL, interval),
        canon.width() * interval.width() / TAU,
    ))
}

/// Parameters of [`unwrap`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnwrapOptions {
    /// Index of the sample kept fixed.
    pub refix: usize,
    /// Period the data was wrapped with.
    pub period: f64,
    /// Jumps at least this large are treated as wraps; `None` means `period / 2`.
    pub tol: Option<f64>,
}

impl Default for UnwrapOptions {
    fn default() -> Self {
        Self {
            refix: 0,
            period: TAU,
            tol: None,
        }
    }
}

/// Undo the wrapping of a sequence of periodic samples.
///
/// Starting from `opts.refix`, walks outward in both directions and shifts each
/// sample by the multiple of `opts.period` that keeps its jump from the
/// previous one below the tolerance. NaN samples are kept and the walk resumes
/// from the last non-NaN sample.
pub fn unwrap(a: &[f64], opts: &UnwrapOptions) -> Result<Vec<f64>, StatsError> {
    let mut unwrapped = a.to_vec();
    unwrap_in_place(&mut unwrapped, opts)?;
    Ok(unwrapped)
}

/// In-place [`unwrap`], returning the same buffer.
///
/// # Errors
/// Returns [`StatsError::InvalidParameter`] for a period or tolerance that is
/// not positive and finite, and [`StatsError::IndexOutOfBounds`] if `opts.refix` is not an
/// index of a non-empty `a`.
pub fn unwrap_in_place<'a>(
    a: &'a mut [f64],
    opts: &UnwrapOptions,
) -> Result<&'a mut [f64], StatsError> {
    let period = opts.period;
    if !(period > 0.0 && period.is_finite()) {
        return Err(StatsError::InvalidParameter(format!(
            "period must be positive and finite, but is {period}"
        )));
    }
    let tol = opts.tol.unwrap_or(period / 2.0);
    if !(tol > 0.0 && tol.is_finite()) {
        return Err(StatsError::InvalidParameter(format!(
            "tolerance must be positive and finite, but is {tol}"
        )));
    }

    if a.is_empty() {
        return Ok(a);
    }
    let len = a.len();
    if opts.refix >= len {
        return Err(StatsError::IndexOutOfBounds {
            index: opts.refix,
            len,
        });
    }

    // NaN samples are left in place and skipped over.
    let mut anchor = a[opts.refix];
    for idx in opts.refix + 1..len {
        a[idx] = unwrap_step(anchor, a[idx], period, tol);
        if !a[idx].is_nan() {
            anchor = a[idx];
        }
    }
    let mut anchor = a[opts.refix];
    for idx in (0..opts.refix).rev() {
        a[idx] = unwrap_step(anchor, a[idx], period, tol);
        if !a[idx].is_nan() {
            anchor = a[idx];
        }
    }

    Ok(a)
}

fn unwrap_step(prev: f64, cur: f64, period: f64, tol: f64) -> f64 {
    let jump = cur - prev;
    if !(jump.abs() >= tol) {
        cur
    } else {
        cur - (jump / period).round() * period
    }
}

/// Fold a closed curve of angles into `interval`, breaking it at the wraps.
///
/// See [`wrap_curve_closed_by`].
pub fn wrap_curve_closed(data: &[f64], interval: Interval) -> Result<Vec<f64>, StatsError> {
    wrap_curve_closed_by(data, interval, |ang: &mut f64| ang)
}

/// Fold a closed curve into `interval` along the coordinate selected by `field`.
///
/// Wherever consecutive vertices (including last to first) are closer around
/// the circle than along the line, the segment crosses the interval boundary.
/// There an exit vertex at the crossed boundary, a break vertex whose
/// coordinate is NaN and an entry vertex at the opposite boundary are
/// inserted, so that line-segment rendering does not draw a spurious segment
/// across the interval. Boundary vertices are nudged slightly inward.
///
/// If the curve has breaks, the output is rotated so it starts right after
/// the first break, which is dropped: the open ends of the sequence already
/// terminate the curve there. A curve without breaks keeps its order.
///
/// Only the selected coordinate is modified; boundary and break vertices copy
/// every other field from the vertex they are attached to.
pub fn wrap_curve_closed_by<T, F>(
    data: &[T],
    interval: Interval,
    field: F,
) -> Result<Vec<T>, StatsError>
where
    T: Clone,
    F: Fn(&mut T) -> &mut f64,
{
    interval.check_period()?;

    let mut folded = data.to_vec();
    let coords: Vec<_> = folded
        .iter_mut()
        .map(|pnt| {
            let coord = field(pnt);
            *coord = interval.mod_into(*coord);
            *coord
        })
        .collect();

    let width = interval.width();
    let nudge = NUDGE_REL * width;
    let lo = interval.left() + nudge;
    let hi = interval.right() - nudge;

    let with_coord = |pnt: &T, val: f64| {
        let mut pnt = pnt.clone();
        *field(&mut pnt) = val;
        pnt
    };

    let n_pnts = folded.len();
    let mut wrapped = Vec::with_capacity(n_pnts + 3);
    let mut first_break = None;
    for idx in 0..n_pnts {
        let next = (idx + 1) % n_pnts;
        wrapped.push(folded[idx].clone());

        let naive = coords[next] - coords[idx];
        let circ = center_angle_at(naive, 0.0, width);
        if naive.is_nan() || naive.abs() - circ.abs() <= WRAP_TOL_REL * width {
            continue;
        }

        let (exit, entry) = if circ > 0.0 { (hi, lo) } else { (lo, hi) };
        wrapped.push(with_coord(&folded[idx], exit));
        first_break.get_or_insert(wrapped.len());
        wrapped.push(with_coord(&folded[idx], f64::NAN));
        wrapped.push(with_coord(&folded[next], entry));
    }

    if let Some(idx) = first_break {
        wrapped.rotate_left(idx);
        wrapped.remove(0);
    }

    Ok(wrapped)
}

/// Remap `x` from `interval` onto the canonical circle.
fn to_canonical(x: &[f64], interval: Interval) -> Result<Vec<f64>, StatsError> {
    interval.check_period()?;
    Ok(x.iter()
        .map(|&val| shift_range(val, interval, CANONICAL))
        .collect())
}

/// Index of the first sample minimizing the summed arc distance.
fn medoid_index(x: &[f64]) -> usize {
    let mut best_idx = 0;
    let mut best_cost = f64::INFINITY;
    for (idx, &cand) in x.iter().enumerate() {
        let cost: f64 = x.iter().map(|&ang| distance(cand, ang)).sum();
        if cost < best_cost {
            best_idx = idx;
            best_cost = cost;
        }
    }
    best_idx
}

fn has_non_finite(x: &[f64]) -> bool {
    x.iter().any(|val| !val.is_finite())
}

fn check_non_empty(x: &[f64]) -> Result<(), StatsError> {
    if x.is_empty() {
        Err(StatsError::EmptyInput)
    } else {
        Ok(())
    }
}
