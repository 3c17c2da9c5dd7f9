//! Points the geometric-median engine can operate on.

use num_complex::Complex64;

/// Element of a normed vector space.
///
/// The geometric-median engine only needs addition, subtraction, scaling by a
/// real and the Euclidean norm.
pub trait Point: Copy {
    /// Additive identity.
    fn zero() -> Self;

    fn plus(self, other: Self) -> Self;

    fn minus(self, other: Self) -> Self;

    fn scale(self, factor: f64) -> Self;

    /// Euclidean norm.
    fn norm(self) -> f64;

    fn distance_to(self, other: Self) -> f64 {
        self.minus(other).norm()
    }
}

impl Point for f64 {
    fn zero() -> Self {
        0.0
    }

    fn plus(self, other: Self) -> Self {
        self + other
    }

    fn minus(self, other: Self) -> Self {
        self - other
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    fn norm(self) -> f64 {
        self.abs()
    }
}

impl Point for Complex64 {
    fn zero() -> Self {
        Complex64::new(0.0, 0.0)
    }

    fn plus(self, other: Self) -> Self {
        self + other
    }

    fn minus(self, other: Self) -> Self {
        self - other
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    fn norm(self) -> f64 {
        Complex64::norm(self)
    }
}

impl<const N: usize> Point for [f64; N] {
    fn zero() -> Self {
        [0.0; N]
    }

    fn plus(self, other: Self) -> Self {
        let mut sum = self;
        sum.iter_mut().zip(other).for_each(|(a, b)| *a += b);
        sum
    }

    fn minus(self, other: Self) -> Self {
        let mut diff = self;
        diff.iter_mut().zip(other).for_each(|(a, b)| *a -= b);
        diff
    }

    fn scale(self, factor: f64) -> Self {
        self.map(|ele| ele * factor)
    }

    fn norm(self) -> f64 {
        self.iter().map(|ele| ele * ele).sum::<f64>().sqrt()
    }
}
