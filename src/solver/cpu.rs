//! Host implementation of the batched Thomas solve.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use super::{
    BatchCoefficients, PreconditionCheck, PreconditionError, SystemBatch, TridiagonalCoefficients,
    TridiagonalSolver, thomas,
};
use crate::error::Result;

type Checked<T> = std::result::Result<T, PreconditionError>;

/// Batched Thomas solver running on the host.
///
/// With the `parallel` feature each system is a rayon task; otherwise the
/// systems are solved one after another. Results are identical either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuSolver {
    precondition: PreconditionCheck,
    parallel: bool,
}

impl Default for CpuSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSolver {
    /// Solver using every available core when `parallel` is enabled.
    pub fn new() -> Self {
        Self {
            precondition: PreconditionCheck::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Solver that never leaves the calling thread.
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::new()
        }
    }

    /// Set the precondition check.
    pub fn with_precondition(mut self, precondition: PreconditionCheck) -> Self {
        self.precondition = precondition;
        self
    }

    /// Configured precondition check.
    pub fn precondition(&self) -> PreconditionCheck {
        self.precondition
    }

    /// True if systems are distributed over the rayon pool.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    fn solve_uniform(
        &self,
        coeffs: &TridiagonalCoefficients,
        rhs: &[f64],
        n: usize,
    ) -> Checked<Vec<f64>> {
        let (a, b, c) = (&coeffs.a[..], &coeffs.b[..], &coeffs.c[..]);
        self.precondition.check_dominance(0, a, b, c)?;

        // Shared by every system, read-only during the sweeps
        let mut c2 = vec![0.0; n];
        thomas::eliminate(a, b, c, &mut c2);
        self.precondition.check_pivots(0, a, b, &c2)?;

        let mut d = rhs.to_vec();
        let mut x = vec![0.0; rhs.len()];
        self.for_each_system(&mut d, &mut x, n, |_, d, x, _| {
            thomas::sweep(a, b, &c2, d, x);
            Ok(())
        })?;
        Ok(x)
    }

    fn solve_per_system(
        &self,
        coeffs: &TridiagonalCoefficients,
        rhs: &[f64],
        n: usize,
    ) -> Checked<Vec<f64>> {
        let check = self.precondition;
        let mut d = rhs.to_vec();
        let mut x = vec![0.0; rhs.len()];
        self.for_each_system(&mut d, &mut x, n, |s, d, x, c2| {
            let (a, b, c) = coeffs.rows(s * n..(s + 1) * n);
            check.check_dominance(s, a, b, c)?;
            thomas::eliminate(a, b, c, c2);
            check.check_pivots(s, a, b, c2)?;
            thomas::sweep(a, b, c2, d, x);
            Ok(())
        })?;
        Ok(x)
    }

    /// Run `job(system, d, x, c2_scratch)` for every system of the batch.
    fn for_each_system<F>(
        &self,
        d: &mut [f64],
        x: &mut [f64],
        n: usize,
        job: F,
    ) -> Checked<()>
    where
        F: Fn(usize, &mut [f64], &mut [f64], &mut [f64]) -> Checked<()> + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return d
                    .par_chunks_mut(n)
                    .zip(x.par_chunks_mut(n))
                    .enumerate()
                    .try_for_each_init(
                        || vec![0.0; n],
                        |c2, (s, (d, x))| job(s, d, x, c2),
                    );
            }
        }

        let mut c2 = vec![0.0; n];
        d.chunks_mut(n)
            .zip(x.chunks_mut(n))
            .enumerate()
            .try_for_each(|(s, (d, x))| job(s, d, x, &mut c2))
    }
}

impl TridiagonalSolver for CpuSolver {
    fn name(&self) -> &'static str {
        if self.parallel { "cpu-rayon" } else { "cpu" }
    }

    fn solve_batch(&self, batch: &SystemBatch) -> Result<Vec<f64>> {
        let n = batch.system_size();
        trace!(
            solver = self.name(),
            systems = batch.num_systems(),
            size = n,
            "solving tridiagonal batch"
        );
        if batch.num_systems() == 0 {
            return Ok(Vec::new());
        }

        let x = match batch.coefficients() {
            BatchCoefficients::Uniform(coeffs) => self.solve_uniform(coeffs, batch.rhs(), n)?,
            BatchCoefficients::PerSystem(coeffs) => {
                self.solve_per_system(coeffs, batch.rhs(), n)?
            }
        };
        Ok(x)
    }
}
