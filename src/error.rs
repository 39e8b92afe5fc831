//! Error types shared across the derivative pipeline.
//!
//! Every failure aborts the current derivative request. Errors from the
//! individual stages are collected into [`DerivativeError`] without extra
//! decoration, so callers can match on the original cause.

use thiserror::Error;

use crate::comm::CommunicationError;
use crate::halo::BoundaryPolicy;
use crate::solver::{DeviceError, PreconditionError, SolverError};
use crate::types::{Axis, Extent3, Rank};

/// Invalid grid, partition, halo or scheme configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Grid extent not divisible by the number of ranks along an axis.
    #[error("{points} points along {axis} cannot be split evenly across {parts} ranks")]
    UnevenPartition {
        axis: Axis,
        points: usize,
        parts: usize,
    },

    /// Halo width of zero.
    #[error("halo width must be at least 1")]
    ZeroHalo,

    /// Local extent smaller than the halo width.
    #[error("local extent {extent} along {axis} is smaller than halo width {halo}")]
    HaloTooWide { axis: Axis, extent: usize, halo: usize },

    /// Halo narrower than the stencil reach of the scheme.
    #[error("scheme {scheme} needs a halo of width {required}, got {actual}")]
    HaloTooNarrow {
        scheme: &'static str,
        required: usize,
        actual: usize,
    },

    /// Local extent too small for the requested boundary closure.
    #[error("local extent {extent} along {axis} is below the minimum of {required}")]
    ExtentTooSmall {
        axis: Axis,
        extent: usize,
        required: usize,
    },

    /// Boundary policy disagrees with the periodicity of the topology.
    #[error("boundary policy {policy:?} along {axis} conflicts with topology periodicity {periodic}")]
    BoundaryMismatch {
        axis: Axis,
        policy: BoundaryPolicy,
        periodic: bool,
    },

    /// Field does not have the shape of the local block.
    #[error("field shape mismatch: expected {expected}, got {actual}")]
    FieldShape { expected: Extent3, actual: Extent3 },

    /// Grid spacing that is not a positive finite number.
    #[error("grid spacing along {axis} must be positive and finite, got {spacing}")]
    InvalidSpacing { axis: Axis, spacing: f64 },
}

impl ConfigurationError {
    /// Create a field shape mismatch error.
    pub fn field_shape(expected: Extent3, actual: Extent3) -> Self {
        Self::FieldShape { expected, actual }
    }
}

/// Process topology that does not match the participating processes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Product of the topology extents differs from the process count.
    #[error("topology {dims:?} holds {product} ranks but {size} processes participate")]
    SizeMismatch {
        dims: [usize; 3],
        product: usize,
        size: usize,
    },

    /// A topology extent of zero.
    #[error("topology {dims:?} has a zero extent")]
    ZeroExtent { dims: [usize; 3] },

    /// Rank outside the communicator.
    #[error("{rank} is out of range for {size} ranks")]
    RankOutOfRange { rank: Rank, size: usize },
}

/// Any failure of a derivative request.
#[derive(Error, Debug)]
pub enum DerivativeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Communication(#[from] CommunicationError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// Result alias for derivative requests.
pub type Result<T, E = DerivativeError> = std::result::Result<T, E>;
