//! Error types for batched tridiagonal solves.

use thiserror::Error;

use crate::types::Axis;

/// Malformed batch input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Array length inconsistent with the batch shape.
    #[error("{what}: expected {expected} values, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Systems of size zero.
    #[error("system size must be at least 1")]
    EmptySystem,
}

impl SolverError {
    /// Create a shape error.
    pub fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::Shape {
            what,
            expected,
            actual,
        }
    }
}

/// A system the Thomas algorithm cannot solve reliably.
///
/// The algorithm performs no pivoting; it is only stable for diagonally
/// dominant systems. These errors are raised by the optional precondition
/// check instead of letting a vanishing pivot turn into NaNs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreconditionError {
    /// A row whose diagonal is smaller than its off-diagonals.
    #[error("system {system} row {row} is not diagonally dominant (|b| = {diagonal:e} < {off_diagonal:e})")]
    NotDiagonallyDominant {
        system: usize,
        row: usize,
        diagonal: f64,
        off_diagonal: f64,
    },

    /// No row is strictly dominant, so the matrix may be singular.
    #[error("system {system} has no strictly diagonally dominant row")]
    NoStrictRow { system: usize },

    /// Elimination produced a (near) zero pivot.
    #[error("system {system} row {row} has a vanishing pivot {pivot:e}")]
    VanishingPivot { system: usize, row: usize, pivot: f64 },

    /// The reduced system coupling neighboring subdomains is singular.
    #[error("interface system along {axis} is singular")]
    SingularInterface { axis: Axis },
}

/// Failure on the compute device.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    /// Reading results back from the device failed.
    #[error("device transfer failed: {0}")]
    DataTransfer(String),

    /// The device returned NaN or Inf.
    #[error("device produced a non-finite solution: {0}")]
    NumericalError(String),
}
