//! Global grid resolution.

use std::fmt;

use super::{Axis, Extent3};

/// Point counts of the full (undecomposed) domain.
///
/// Immutable and shared read-only by all ranks. Provides a strongly-typed
/// way to specify the grid, preventing mix-ups between global and local
/// extents.
///
/// # Example
///
/// ```
/// use cfd_rs::types::{Axis, GlobalGrid};
///
/// let grid = GlobalGrid::new(8, 32, 16);
/// assert_eq!(grid.nz(), 8);
/// assert_eq!(grid.points(Axis::Y), 32);
/// assert_eq!(grid.total_points(), 4096);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlobalGrid {
    extent: Extent3,
}

impl GlobalGrid {
    /// Create a new global grid.
    ///
    /// # Panics
    ///
    /// Panics if any extent is zero.
    pub fn new(nz: usize, ny: usize, nx: usize) -> Self {
        assert!(nz > 0, "nz must be positive, got {}", nz);
        assert!(ny > 0, "ny must be positive, got {}", ny);
        assert!(nx > 0, "nx must be positive, got {}", nx);
        Self {
            extent: Extent3::new(nz, ny, nx),
        }
    }

    /// A cubic grid with `n` points per axis.
    pub fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Points along z.
    #[inline]
    pub fn nz(&self) -> usize {
        self.extent.nz
    }

    /// Points along y.
    #[inline]
    pub fn ny(&self) -> usize {
        self.extent.ny
    }

    /// Points along x.
    #[inline]
    pub fn nx(&self) -> usize {
        self.extent.nx
    }

    /// Points along `axis`.
    #[inline]
    pub fn points(&self, axis: Axis) -> usize {
        self.extent.get(axis)
    }

    /// Extent of the full grid.
    #[inline]
    pub fn extent(&self) -> Extent3 {
        self.extent
    }

    /// Total number of grid points.
    #[inline]
    pub fn total_points(&self) -> usize {
        self.extent.len()
    }
}

impl fmt::Display for GlobalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extent)
    }
}
