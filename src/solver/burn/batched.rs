//! [`TridiagonalSolver`] implementation on a Burn device.

use burn::prelude::*;
use tracing::{trace, warn};

use super::backend::{TridiagonalBackend, download, is_reduced_precision, upload};
use super::kernels::{thomas_per_system, thomas_uniform};
use crate::error::Result;
use crate::solver::{
    BatchCoefficients, DeviceError, PreconditionCheck, SystemBatch, TridiagonalSolver, thomas,
};

/// Batched Thomas solver on a Burn backend.
///
/// The device is owned by the solver; there is no process-wide device
/// state. Each call uploads the right-hand sides (and per-system
/// coefficients) as `[num_systems, system_size]` tensors, runs the
/// column-wise elimination and downloads the solution.
///
/// Backends computing in `f32` lose roughly half the digits of the host
/// solver; a warning is logged when such a solver is created.
#[derive(Debug, Clone)]
pub struct BurnSolver<B: TridiagonalBackend> {
    device: B::Device,
    precondition: PreconditionCheck,
}

impl<B: TridiagonalBackend> BurnSolver<B> {
    /// Solver on `device`.
    pub fn new(device: B::Device) -> Self {
        if is_reduced_precision::<B>() {
            warn!(
                bytes = std::mem::size_of::<B::FloatElem>(),
                "burn backend float element is narrower than f64; derivatives lose accuracy"
            );
        }
        Self {
            device,
            precondition: PreconditionCheck::default(),
        }
    }

    /// Solver on the backend's default device.
    pub fn with_default_device() -> Self {
        Self::new(B::default_device())
    }

    /// Set the precondition check.
    pub fn with_precondition(mut self, precondition: PreconditionCheck) -> Self {
        self.precondition = precondition;
        self
    }

    /// Device the batches run on.
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    fn solve_on_device(&self, batch: &SystemBatch) -> Result<Tensor<B, 2>> {
        let m = batch.num_systems();
        let n = batch.system_size();
        let d = upload::<B>(batch.rhs(), m, n, &self.device);

        let x = match batch.coefficients() {
            BatchCoefficients::Uniform(coeffs) => {
                let (a, b, c) = (&coeffs.a[..], &coeffs.b[..], &coeffs.c[..]);
                self.precondition.check_dominance(0, a, b, c)?;
                let mut c2 = vec![0.0; n];
                thomas::eliminate(a, b, c, &mut c2);
                self.precondition.check_pivots(0, a, b, &c2)?;
                thomas_uniform(a, b, &c2, d)
            }
            BatchCoefficients::PerSystem(coeffs) => {
                for s in 0..m {
                    let (a, b, c) = batch.system_coefficients(s);
                    self.precondition.check_dominance(s, a, b, c)?;
                }
                thomas_per_system(
                    upload::<B>(&coeffs.a, m, n, &self.device),
                    upload::<B>(&coeffs.b, m, n, &self.device),
                    upload::<B>(&coeffs.c, m, n, &self.device),
                    d,
                )
            }
        };
        Ok(x)
    }
}

impl<B: TridiagonalBackend> TridiagonalSolver for BurnSolver<B> {
    fn name(&self) -> &'static str {
        "burn"
    }

    fn solve_batch(&self, batch: &SystemBatch) -> Result<Vec<f64>> {
        trace!(
            solver = self.name(),
            systems = batch.num_systems(),
            size = batch.system_size(),
            "dispatching tridiagonal batch"
        );
        if batch.num_systems() == 0 {
            return Ok(Vec::new());
        }

        let x = download(self.solve_on_device(batch)?)?;
        if self.precondition.is_enabled() {
            if let Some(pos) = x.iter().position(|v| !v.is_finite()) {
                return Err(DeviceError::NumericalError(format!(
                    "non-finite value in system {} row {}",
                    pos / batch.system_size(),
                    pos % batch.system_size()
                ))
                .into());
            }
        }
        Ok(x)
    }
}
