//! Derivative configuration.

use crate::halo::BoundaryPolicy;
use crate::stencil::CompactScheme;
use crate::types::{Axis, Bounds3D, GlobalGrid};

/// Configuration of a [`CompactDerivative`](super::CompactDerivative).
#[derive(Clone, Debug, PartialEq)]
pub struct DerivativeConfig {
    /// Interior compact scheme.
    pub scheme: CompactScheme,
    /// Boundary policy per axis, `[z, y, x]`.
    pub boundary: [BoundaryPolicy; 3],
    /// Grid spacing per axis, `[z, y, x]`.
    pub spacing: [f64; 3],
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self {
            scheme: CompactScheme::Pade4,
            boundary: [BoundaryPolicy::Periodic; 3],
            spacing: [1.0; 3],
        }
    }
}

impl DerivativeConfig {
    /// Set the interior scheme.
    pub fn with_scheme(mut self, scheme: CompactScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Use `policy` on every axis.
    pub fn with_boundary(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary = [policy; 3];
        self
    }

    /// Set the boundary policy of one axis.
    pub fn with_axis_boundary(mut self, axis: Axis, policy: BoundaryPolicy) -> Self {
        self.boundary[axis.index()] = policy;
        self
    }

    /// Set the grid spacing of every axis.
    pub fn with_spacing(mut self, spacing: [f64; 3]) -> Self {
        self.spacing = spacing;
        self
    }

    /// Derive the spacing from physical bounds.
    ///
    /// Periodic axes place `N` points on `[min, max)`, one-sided axes
    /// place them on `[min, max]`. Set the boundary policies first.
    pub fn with_bounds(mut self, bounds: &Bounds3D, grid: GlobalGrid) -> Self {
        for axis in Axis::ALL {
            let periodic = self.policy(axis).is_periodic();
            self.spacing[axis.index()] = bounds.spacing(axis, grid.points(axis), periodic);
        }
        self
    }

    /// Boundary policy along `axis`.
    #[inline]
    pub fn policy(&self, axis: Axis) -> BoundaryPolicy {
        self.boundary[axis.index()]
    }

    /// Periodicity flags for building a matching topology.
    pub fn periodicity(&self) -> [bool; 3] {
        self.boundary.map(BoundaryPolicy::is_periodic)
    }
}
