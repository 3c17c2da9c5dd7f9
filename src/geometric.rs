//! Geometric median and the spread measures built on it.
//!
//! The geometric median of a point set is the point minimizing the sum of
//! Euclidean distances to every point. It has no closed form; both supported
//! algorithms are fixed-point iterations started at the arithmetic mean:
//!
//! - **Weiszfeld**: replaces the estimate with the inverse-distance-weighted
//!   mean of the points. A point coinciding with the estimate would get an
//!   infinite weight, so its distance is taken to be 1.
//! - **Vardi–Zhang**: same update while no point coincides with the estimate;
//!   otherwise blends the weighted mean of the remaining points with the
//!   current estimate, which keeps the iteration well defined and lets it
//!   settle exactly on a data point that is the minimizer.
//!
//! Iteration stops once a step is shorter than `atol` or after `max_iter`
//! steps. Reaching the iteration cap is not an error: the last estimate is
//! returned either way.

use crate::errors::StatsError;
use crate::point::Point;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Fixed-point iteration used to locate the geometric median.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometricMedianAlgorithm {
    Weiszfeld,
    #[default]
    VardiZhang,
}

/// Parameters of [`geometric_median_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometricMedianOptions {
    pub algorithm: GeometricMedianAlgorithm,
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Step length below which the iteration is considered converged.
    pub atol: f64,
}

impl Default for GeometricMedianOptions {
    fn default() -> Self {
        Self {
            algorithm: GeometricMedianAlgorithm::default(),
            max_iter: 1000,
            atol: 1e-7,
        }
    }
}

impl GeometricMedianOptions {
    fn validate(&self) -> Result<(), StatsError> {
        if self.max_iter == 0 {
            return Err(StatsError::InvalidParameter(
                "maximum number of iterations must be positive".to_string(),
            ));
        }
        if !(self.atol > 0.0) {
            return Err(StatsError::InvalidParameter(format!(
                "absolute tolerance must be positive, but is {}",
                self.atol
            )));
        }
        Ok(())
    }
}

/// Arithmetic mean of a point set.
pub fn mean_point<P: Point>(points: &[P]) -> Result<P, StatsError> {
    if points.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sum = points.iter().fold(P::zero(), |acc, &pnt| acc.plus(pnt));
    Ok(sum.scale(1.0 / points.len() as f64))
}

/// Geometric median with the default options (Vardi–Zhang, 1000 iterations,
/// `atol = 1e-7`).
pub fn geometric_median<P: Point>(points: &[P]) -> Result<P, StatsError> {
    geometric_median_with(points, &GeometricMedianOptions::default())
}

/// Geometric median.
///
/// # Errors
/// Returns [`StatsError::EmptyInput`] for an empty point set and
/// [`StatsError::InvalidParameter`] for a zero iteration cap or a
/// non-positive tolerance.
pub fn geometric_median_with<P: Point>(
    points: &[P],
    opts: &GeometricMedianOptions,
) -> Result<P, StatsError> {
    opts.validate()?;
    let mut est = mean_point(points)?;

    let mut dists = Vec::with_capacity(points.len());
    for i_iter in 0..opts.max_iter {
        dists.clear();
        dists.extend(points.iter().map(|&pnt| pnt.distance_to(est)));

        let next = match opts.algorithm {
            GeometricMedianAlgorithm::Weiszfeld => weiszfeld_step(points, &dists),
            GeometricMedianAlgorithm::VardiZhang => match vardi_zhang_step(points, &dists, est) {
                Some(next) => next,
                None => {
                    log::debug!("every point coincides with the estimate at iteration {i_iter}");
                    return Ok(est);
                }
            },
        };

        let step = next.distance_to(est);
        est = next;
        log::trace!("iteration {i_iter}: step {step:e}");

        if step < opts.atol {
            log::debug!("geometric median converged after {} iterations", i_iter + 1);
            return Ok(est);
        }
        if step.is_nan() {
            log::debug!("geometric median is NaN at iteration {i_iter}");
            return Ok(est);
        }
    }

    log::debug!(
        "geometric median did not converge within {} iterations",
        opts.max_iter
    );
    Ok(est)
}

fn weiszfeld_step<P: Point>(points: &[P], dists: &[f64]) -> P {
    let mut wt_sum = 0.0;
    let mut num = P::zero();
    for (&pnt, &dist) in points.iter().zip(dists) {
        let wt = if dist == 0.0 { 1.0 } else { 1.0 / dist };
        wt_sum += wt;
        num = num.plus(pnt.scale(wt));
    }
    num.scale(1.0 / wt_sum)
}

/// Returns `None` when every point coincides with `est`.
fn vardi_zhang_step<P: Point>(points: &[P], dists: &[f64], est: P) -> Option<P> {
    let mut n_coinc = 0;
    let mut wt_sum = 0.0;
    let mut num = P::zero();
    for (&pnt, &dist) in points.iter().zip(dists) {
        if dist == 0.0 {
            n_coinc += 1;
            continue;
        }
        let wt = 1.0 / dist;
        wt_sum += wt;
        num = num.plus(pnt.scale(wt));
    }

    if n_coinc == points.len() {
        return None;
    }
    let wt_mean = num.scale(1.0 / wt_sum);
    if n_coinc == 0 {
        return Some(wt_mean);
    }

    // Pull of the non-coincident points against the mass sitting on `est`.
    let pull = wt_mean.minus(est).scale(wt_sum).norm();
    let ratio = if pull == 0.0 {
        0.0
    } else {
        n_coinc as f64 / pull
    };
    Some(
        wt_mean
            .scale((1.0 - ratio).max(0.0))
            .plus(est.scale(ratio.min(1.0))),
    )
}

/// Median distance of the points to their geometric median.
///
/// Rotation invariant, and equal to the unnormalized median absolute
/// deviation for real data of odd length.
pub fn geometric_mad<P: Point>(points: &[P]) -> Result<f64, StatsError> {
    geometric_mad_with(points, &GeometricMedianOptions::default())
}

pub fn geometric_mad_with<P: Point>(
    points: &[P],
    opts: &GeometricMedianOptions,
) -> Result<f64, StatsError> {
    let med = geometric_median_with(points, opts)?;
    let dists: Vec<_> = points.iter().map(|&pnt| pnt.distance_to(med)).collect();
    stats::median(&dists)
}

/// Indices of the two points furthest apart.
///
/// Brute force over the pairs `i < j` in lexicographic order; the first pair
/// reaching the maximum distance wins. A single point pairs with itself.
pub fn most_distant_points_ix<P: Point>(points: &[P]) -> Result<(usize, usize), StatsError> {
    if points.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let mut best = (0, 0);
    let mut best_dist = f64::NEG_INFINITY;
    for (i_a, &pnt_a) in points.iter().enumerate() {
        for (i_b, &pnt_b) in points.iter().enumerate().skip(i_a + 1) {
            let dist = pnt_a.distance_to(pnt_b);
            if dist > best_dist {
                best = (i_a, i_b);
                best_dist = dist;
            }
        }
    }
    Ok(best)
}

pub fn most_distant_points<P: Point>(points: &[P]) -> Result<(P, P), StatsError> {
    let (i_a, i_b) = most_distant_points_ix(points)?;
    Ok((points[i_a], points[i_b]))
}

/// Spread of a point set about its mean: `sqrt(Σ‖pᵢ - mean‖² / (n - 1))`.
pub fn vec_std<P: Point>(points: &[P]) -> Result<f64, StatsError> {
    vec_std_about(points, mean_point(points)?)
}

/// Spread of a point set about `center`; NaN for a single point.
pub fn vec_std_about<P: Point>(points: &[P], center: P) -> Result<f64, StatsError> {
    let n_pnts = points.len();
    if n_pnts == 0 {
        return Err(StatsError::EmptyInput);
    }
    if n_pnts == 1 {
        return Ok(f64::NAN);
    }
    let sq_sum: f64 = points
        .iter()
        .map(|&pnt| pnt.distance_to(center).powi(2))
        .sum();
    Ok((sq_sum / (n_pnts - 1) as f64).sqrt())
}
