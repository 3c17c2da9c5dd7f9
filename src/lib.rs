//! Descriptive statistics for circular data and for point sets.
//!
//! Linear statistics give wrong answers for periodic quantities: the
//! arithmetic mean of 359° and 1° is 180°. The [`circular`] module redefines
//! mean, variance, standard deviation, median and median absolute deviation
//! for data on a circle of any period, and provides unwrapping and a
//! plotting helper for curves crossing the period boundary. The
//! [`geometric`] module computes the geometric median, a rotation-invariant
//! multivariate median, for any type implementing [`Point`].
//!
//! Every function is a pure computation over its inputs.

pub mod circular;
pub mod errors;
pub mod geometric;
pub mod interval;
pub mod point;
pub mod stats;

pub use circular::{
    UnwrapOptions, distance, mad as circular_mad, mean as circular_mean,
    median as circular_median, sample_interval, sample_range, std_dev as circular_std, unwrap,
    unwrap_in_place, var as circular_var, wrap_curve_closed, wrap_curve_closed_by,
};
pub use errors::StatsError;
pub use geometric::{
    GeometricMedianAlgorithm, GeometricMedianOptions, geometric_mad, geometric_median,
    geometric_median_with, most_distant_points, most_distant_points_ix, vec_std,
};
pub use interval::{Interval, shift_range};
pub use point::Point;
