//! Batched tridiagonal solvers.
//!
//! Every line of a compact finite-difference stencil produces one
//! tridiagonal system; a derivative along an axis produces thousands of
//! small, independent ones. This module solves such batches with the
//! Thomas algorithm, one worker per system.
//!
//! # Submodules
//!
//! - [`thomas`]: elimination and sweep kernels for a single system
//! - [`burn`]: tensor backend on top of Burn (feature `burn`)
//!
//! # Backends
//!
//! - [`CpuSolver`]: host solver, rayon-parallel with the `parallel` feature
//! - [`BurnSolver`]: systems as tensor rows on a Burn device
//!
//! Both implement [`TridiagonalSolver`], which is what the derivative
//! pipeline is generic over.

#[cfg(feature = "burn")]
pub mod burn;
mod batch;
mod cpu;
mod error;
mod precondition;
pub mod thomas;

pub use batch::{BatchCoefficients, SystemBatch, TridiagonalCoefficients};
pub use cpu::CpuSolver;
pub use error::{DeviceError, PreconditionError, SolverError};
pub use precondition::{PIVOT_FLOOR, PreconditionCheck};

#[cfg(feature = "burn")]
pub use self::burn::{BurnSolver, TridiagonalBackend};

use crate::error::Result;

/// A backend able to solve a batch of tridiagonal systems.
pub trait TridiagonalSolver: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Solve every system of `batch`.
    ///
    /// Returns the solutions laid out like [`SystemBatch::rhs`].
    fn solve_batch(&self, batch: &SystemBatch) -> Result<Vec<f64>>;
}

impl<S: TridiagonalSolver + ?Sized> TridiagonalSolver for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve_batch(&self, batch: &SystemBatch) -> Result<Vec<f64>> {
        (**self).solve_batch(batch)
    }
}

/// Solve `num_systems` systems of `system_size` unknowns sharing `(a, b, c)`.
///
/// `d` holds the right-hand sides, system-major. Runs on the host with
/// the default [`CpuSolver`].
///
/// # Errors
///
/// - [`SolverError`] if an array length disagrees with the batch shape
/// - [`PreconditionError`] if the system is not diagonally dominant
///
/// # Example
///
/// ```
/// use cfd_rs::solver::solve;
///
/// let n = 4;
/// let d = [1.25, 1.5, 1.5, 1.25, 0.0, 0.0, 0.0, 0.0];
/// let x = solve(&[0.25; 4], &[1.0; 4], &[0.25; 4], &d, 2, n).unwrap();
/// for xi in &x[..n] {
///     assert!((xi - 1.0).abs() < 1e-14);
/// }
/// assert!(x[n..].iter().all(|&xi| xi == 0.0));
/// ```
pub fn solve(
    a: &[f64],
    b: &[f64],
    c: &[f64],
    d: &[f64],
    num_systems: usize,
    system_size: usize,
) -> Result<Vec<f64>> {
    if b.len() != system_size {
        return Err(SolverError::shape("diagonal", system_size, b.len()).into());
    }
    let coeffs = TridiagonalCoefficients::new(a.to_vec(), b.to_vec(), c.to_vec())?;
    let batch = SystemBatch::uniform(coeffs, d.to_vec(), num_systems)?;
    CpuSolver::new().solve_batch(&batch)
}
