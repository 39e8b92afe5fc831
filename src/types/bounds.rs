//! 3D domain bounds.

use std::fmt;

use super::Axis;

/// Box-shaped physical domain, stored as `[z, y, x]` triples.
///
/// Together with the point counts of a [`GlobalGrid`](super::GlobalGrid),
/// the bounds fix the uniform grid spacing along each axis.
///
/// Periodic axes sample `[min, max)` (the point at `max` is the image of
/// the point at `min`), non-periodic axes sample `[min, max]` inclusive.
///
/// # Example
///
/// ```
/// use std::f64::consts::PI;
/// use cfd_rs::types::{Axis, Bounds3D};
///
/// let bounds = Bounds3D::cube(0.0, 2.0 * PI);
///
/// // 8 periodic points over [0, 2π)
/// let dx = bounds.spacing(Axis::X, 8, true);
/// assert!((dx - PI / 4.0).abs() < 1e-15);
///
/// // 9 inclusive points over [0, 2π]
/// let dx = bounds.spacing(Axis::X, 9, false);
/// assert!((dx - PI / 4.0).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds3D {
    /// Lower corner `[z, y, x]`
    pub min: [f64; 3],
    /// Upper corner `[z, y, x]`
    pub max: [f64; 3],
}

impl Bounds3D {
    /// Create new domain bounds.
    ///
    /// # Panics
    ///
    /// Panics if `max <= min` on any axis.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        for axis in Axis::ALL {
            let a = axis.index();
            assert!(
                max[a] > min[a],
                "{}_max ({}) must be greater than {}_min ({})",
                axis,
                max[a],
                axis,
                min[a]
            );
        }
        Self { min, max }
    }

    /// Same interval `[lo, hi]` on every axis.
    pub fn cube(lo: f64, hi: f64) -> Self {
        Self::new([lo; 3], [hi; 3])
    }

    /// Unit cube `[0, 1]^3`.
    pub fn unit_cube() -> Self {
        Self::cube(0.0, 1.0)
    }

    /// Domain length along `axis`.
    #[inline]
    pub fn length(&self, axis: Axis) -> f64 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    /// Uniform spacing for `points` samples along `axis`.
    ///
    /// # Panics
    ///
    /// Panics if `points` is zero, or one on a non-periodic axis.
    pub fn spacing(&self, axis: Axis, points: usize, periodic: bool) -> f64 {
        if periodic {
            assert!(points > 0, "need at least one point along {}", axis);
            self.length(axis) / points as f64
        } else {
            assert!(points > 1, "need at least two points along {}", axis);
            self.length(axis) / (points - 1) as f64
        }
    }

    /// Physical coordinate of global index `index` along `axis`.
    #[inline]
    pub fn coordinate(&self, axis: Axis, index: usize, points: usize, periodic: bool) -> f64 {
        self.min[axis.index()] + index as f64 * self.spacing(axis, points, periodic)
    }
}

impl fmt::Display for Bounds3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}] x [{:.3}, {:.3}] x [{:.3}, {:.3}]",
            self.min[0], self.max[0], self.min[1], self.max[1], self.min[2], self.max[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        let b = Bounds3D::new([0.0, -1.0, 2.0], [1.0, 1.0, 5.0]);
        assert_eq!(b.length(Axis::Z), 1.0);
        assert_eq!(b.length(Axis::Y), 2.0);
        assert_eq!(b.length(Axis::X), 3.0);
    }

    #[test]
    fn test_periodic_coordinates_exclude_upper_bound() {
        let b = Bounds3D::unit_cube();
        let last = b.coordinate(Axis::X, 3, 4, true);
        assert!((last - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_inclusive_coordinates_reach_upper_bound() {
        let b = Bounds3D::unit_cube();
        let last = b.coordinate(Axis::Y, 4, 5, false);
        assert!((last - 1.0).abs() < 1e-15);
    }

    #[test]
    #[should_panic(expected = "must be greater")]
    fn test_inverted_bounds_panic() {
        Bounds3D::new([0.0; 3], [1.0, 0.0, 1.0]);
    }
}
