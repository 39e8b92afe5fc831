//! Three-dimensional point counts.

use std::fmt;

use super::Axis;

/// Number of points along each axis of a 3D block, in `[z, y, x]` order.
///
/// # Example
///
/// ```
/// use cfd_rs::types::{Axis, Extent3};
///
/// let e = Extent3::new(2, 3, 4);
/// assert_eq!(e.get(Axis::Y), 3);
/// assert_eq!(e.len(), 24);
/// assert_eq!(e.line_count(Axis::X), 6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent3 {
    /// Points along z
    pub nz: usize,
    /// Points along y
    pub ny: usize,
    /// Points along x
    pub nx: usize,
}

impl Extent3 {
    /// Create a new extent.
    pub const fn new(nz: usize, ny: usize, nx: usize) -> Self {
        Self { nz, ny, nx }
    }

    /// Create from a `[z, y, x]` array.
    pub const fn from_array([nz, ny, nx]: [usize; 3]) -> Self {
        Self { nz, ny, nx }
    }

    /// Convert to a `[z, y, x]` array.
    #[inline]
    pub const fn to_array(self) -> [usize; 3] {
        [self.nz, self.ny, self.nx]
    }

    /// Points along `axis`.
    #[inline]
    pub const fn get(&self, axis: Axis) -> usize {
        match axis {
            Axis::Z => self.nz,
            Axis::Y => self.ny,
            Axis::X => self.nx,
        }
    }

    /// Total number of points.
    #[inline]
    pub const fn len(&self) -> usize {
        self.nz * self.ny * self.nx
    }

    /// True if any axis has zero points.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of grid lines parallel to `axis` (product of the other two extents).
    #[inline]
    pub fn line_count(&self, axis: Axis) -> usize {
        let [p, q] = axis.others();
        self.get(p) * self.get(q)
    }

    /// Grow every axis by `2 * halo`.
    #[inline]
    pub const fn padded(&self, halo: usize) -> Self {
        Self::new(self.nz + 2 * halo, self.ny + 2 * halo, self.nx + 2 * halo)
    }

    /// Row-major linear index of `(k, j, i)`.
    #[inline]
    pub const fn linear(&self, k: usize, j: usize, i: usize) -> usize {
        (k * self.ny + j) * self.nx + i
    }

    /// Row-major strides `[z, y, x]`.
    #[inline]
    pub const fn strides(&self) -> [usize; 3] {
        [self.ny * self.nx, self.nx, 1]
    }
}

impl fmt::Display for Extent3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.nz, self.ny, self.nx)
    }
}

impl From<[usize; 3]> for Extent3 {
    fn from(arr: [usize; 3]) -> Self {
        Self::from_array(arr)
    }
}
