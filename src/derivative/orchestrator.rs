//! The distributed derivative pipeline.

use std::time::{Duration, Instant};

use tracing::debug;

use super::{DerivativeConfig, InterfaceCoupling};
use crate::comm::Communicator;
use crate::decomposition::{Decomposition, Subdomain};
use crate::error::{ConfigurationError, Result, TopologyError};
use crate::field::{Field3, PaddedField};
use crate::halo::exchange_halo;
use crate::solver::TridiagonalSolver;
use crate::stencil::{AxisStencil, assemble, scatter_lines};
use crate::types::Axis;

/// Progress of the current derivative request.
///
/// `Idle → HaloRefreshed → Assembled → Dispatched → Solved → Idle`. Any
/// failure returns the request to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RequestStage {
    /// No request in flight.
    #[default]
    Idle,
    /// Halos along the requested axis are current.
    HaloRefreshed,
    /// Line systems are built.
    Assembled,
    /// The batch has been handed to the solver.
    Dispatched,
    /// Line solutions are available.
    Solved,
}

/// Wall-clock time spent in each stage of a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Halo exchange
    pub exchange: Duration,
    /// Right-hand side assembly
    pub assembly: Duration,
    /// Batched tridiagonal solve, including transfers
    pub solve: Duration,
    /// Interface coupling and scatter
    pub coupling: Duration,
}

impl StageTimings {
    /// Sum of all stages.
    pub fn total(&self) -> Duration {
        self.exchange + self.assembly + self.solve + self.coupling
    }
}

struct AxisPlan {
    stencil: AxisStencil,
    coupling: InterfaceCoupling,
}

/// Compact first derivatives of a distributed field.
///
/// One instance lives on every rank. Construction validates the
/// configuration against the decomposition and the communicator and
/// precomputes, per axis, the line operator and the interface responses.
/// A request then runs
///
/// 1. halo exchange along the axis
/// 2. assembly of one tridiagonal system per grid line
/// 3. the batched solve on `S`
/// 4. interface coupling across the ranks of each line
/// 5. scatter of the lines into the output field
///
/// Requests are collective: every rank must ask for the same axis.
///
/// # Example
///
/// ```
/// use cfd_rs::{CompactDerivative, DerivativeConfig};
/// use cfd_rs::comm::SingleProcess;
/// use cfd_rs::decomposition::{CartesianTopology, Decomposition};
/// use cfd_rs::field::PaddedField;
/// use cfd_rs::solver::CpuSolver;
/// use cfd_rs::types::{Axis, GlobalGrid, Rank};
/// use std::f64::consts::PI;
///
/// let n = 16;
/// let dx = 2.0 * PI / n as f64;
/// let topology = CartesianTopology::new([1, 1, 1], [true; 3], 1).unwrap();
/// let decomp = Decomposition::new(GlobalGrid::cube(n), topology, 1).unwrap();
/// let config = DerivativeConfig::default().with_spacing([dx; 3]);
///
/// let sub = decomp.subdomain(Rank::new(0)).unwrap();
/// let mut field = PaddedField::from_global_fn(&sub, |[_, _, gx]| (gx as f64 * dx).sin());
///
/// let mut ddx =
///     CompactDerivative::new(SingleProcess::new(), decomp, config, CpuSolver::new()).unwrap();
/// let df = ddx.derivative(Axis::X, &mut field).unwrap();
/// assert!((df.get(0, 0, 0) - 1.0).abs() < 1e-3);
/// ```
pub struct CompactDerivative<C: Communicator, S: TridiagonalSolver> {
    comm: C,
    decomposition: Decomposition,
    subdomain: Subdomain,
    config: DerivativeConfig,
    solver: S,
    plans: [AxisPlan; 3],
    stage: RequestStage,
    timings: Option<StageTimings>,
}

impl<C: Communicator, S: TridiagonalSolver> CompactDerivative<C, S> {
    /// Set up the pipeline for the calling rank.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::SizeMismatch`] if the topology does not hold
    ///   `comm.size()` ranks
    /// - [`ConfigurationError::BoundaryMismatch`] if a boundary policy
    ///   disagrees with the topology's periodicity
    /// - [`ConfigurationError::HaloTooNarrow`] if the decomposition's halo
    ///   is narrower than the scheme's reach
    /// - [`ConfigurationError::InvalidSpacing`] or
    ///   [`ConfigurationError::ExtentTooSmall`] from the line operators
    pub fn new(
        comm: C,
        decomposition: Decomposition,
        config: DerivativeConfig,
        solver: S,
    ) -> Result<Self> {
        let topology = decomposition.topology();
        if topology.size() != comm.size() {
            return Err(TopologyError::SizeMismatch {
                dims: topology.dims(),
                product: topology.size(),
                size: comm.size(),
            }
            .into());
        }

        for axis in Axis::ALL {
            let policy = config.policy(axis);
            let periodic = topology.is_periodic(axis);
            if policy.is_periodic() != periodic {
                return Err(ConfigurationError::BoundaryMismatch { axis, policy, periodic }.into());
            }
        }

        let required = config.scheme.halo_width();
        if decomposition.halo() < required {
            return Err(ConfigurationError::HaloTooNarrow {
                scheme: config.scheme.name(),
                required,
                actual: decomposition.halo(),
            }
            .into());
        }

        let subdomain = decomposition.subdomain(comm.rank())?;
        let plan = |axis: Axis| -> Result<AxisPlan> {
            let stencil = AxisStencil::new(
                axis,
                config.scheme,
                config.policy(axis),
                config.spacing[axis.index()],
                subdomain.extent.get(axis),
                subdomain.touches_low_boundary(axis),
                subdomain.touches_high_boundary(axis),
            )?;
            let coupling = InterfaceCoupling::new(&stencil, topology, comm.rank());
            Ok(AxisPlan { stencil, coupling })
        };
        let plans = [plan(Axis::Z)?, plan(Axis::Y)?, plan(Axis::X)?];

        debug!(
            rank = comm.rank().get(),
            solver = solver.name(),
            scheme = %config.scheme,
            local = %subdomain.extent,
            "compact derivative ready"
        );

        Ok(Self {
            comm,
            decomposition,
            subdomain,
            config,
            solver,
            plans,
            stage: RequestStage::Idle,
            timings: None,
        })
    }

    /// The communicator.
    pub fn comm(&self) -> &C {
        &self.comm
    }

    /// The decomposition of the global grid.
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    /// The subdomain owned by this rank.
    pub fn subdomain(&self) -> &Subdomain {
        &self.subdomain
    }

    /// The configuration.
    pub fn config(&self) -> &DerivativeConfig {
        &self.config
    }

    /// The batched solver.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Line operator along `axis`.
    pub fn stencil(&self, axis: Axis) -> &AxisStencil {
        &self.plans[axis.index()].stencil
    }

    /// Current request stage.
    pub fn stage(&self) -> RequestStage {
        self.stage
    }

    /// Stage timings of the last successful request.
    pub fn last_timings(&self) -> Option<StageTimings> {
        self.timings
    }

    /// An empty padded field shaped for this rank.
    pub fn new_field(&self) -> PaddedField {
        PaddedField::for_subdomain(&self.subdomain)
    }

    /// Derivative of `field` along `axis`.
    ///
    /// `field` must carry this rank's interior values; its halo along
    /// `axis` is refreshed as part of the request.
    pub fn derivative(&mut self, axis: Axis, field: &mut PaddedField) -> Result<Field3> {
        let mut out = Field3::zeros(self.subdomain.extent);
        self.derivative_into(axis, field, &mut out)?;
        Ok(out)
    }

    /// Derivative of `field` along `axis`, written into `out`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::FieldShape`] if `field` or `out` do not match
    /// the local block; any stage failure otherwise. `out` is unspecified
    /// after an error.
    pub fn derivative_into(
        &mut self,
        axis: Axis,
        field: &mut PaddedField,
        out: &mut Field3,
    ) -> Result<()> {
        self.check_shapes(field, out)?;
        self.stage = RequestStage::Idle;
        let result = self.run(axis, field, out);
        if let Err(err) = &result {
            debug!(
                rank = self.comm.rank().get(),
                %axis,
                stage = ?self.stage,
                error = %err,
                "derivative request failed"
            );
        }
        self.stage = RequestStage::Idle;
        result
    }

    /// Derivatives along all three axes, `[d/dz, d/dy, d/dx]`.
    pub fn gradient(&mut self, field: &mut PaddedField) -> Result<[Field3; 3]> {
        Ok([
            self.derivative(Axis::Z, field)?,
            self.derivative(Axis::Y, field)?,
            self.derivative(Axis::X, field)?,
        ])
    }

    fn check_shapes(&self, field: &PaddedField, out: &Field3) -> Result<()> {
        let expected = self.subdomain.padded_extent();
        if field.padded_extent() != expected || field.extent() != self.subdomain.extent {
            return Err(ConfigurationError::field_shape(expected, field.padded_extent()).into());
        }
        if out.extent() != self.subdomain.extent {
            return Err(ConfigurationError::field_shape(self.subdomain.extent, out.extent()).into());
        }
        Ok(())
    }

    fn run(&mut self, axis: Axis, field: &mut PaddedField, out: &mut Field3) -> Result<()> {
        let plan = &self.plans[axis.index()];
        let mut timings = StageTimings::default();

        let start = Instant::now();
        exchange_halo(&self.comm, self.decomposition.topology(), field, axis)?;
        self.stage = RequestStage::HaloRefreshed;
        timings.exchange = start.elapsed();

        let start = Instant::now();
        let batch = assemble(field, &plan.stencil)?;
        self.stage = RequestStage::Assembled;
        timings.assembly = start.elapsed();

        let start = Instant::now();
        self.stage = RequestStage::Dispatched;
        let mut solution = self.solver.solve_batch(&batch)?;
        self.stage = RequestStage::Solved;
        timings.solve = start.elapsed();

        let start = Instant::now();
        plan.coupling.apply(&self.comm, &mut solution)?;
        scatter_lines(&solution, axis, out)?;
        timings.coupling = start.elapsed();

        debug!(
            rank = self.comm.rank().get(),
            %axis,
            systems = batch.num_systems(),
            size = batch.system_size(),
            exchange_us = timings.exchange.as_micros() as u64,
            assembly_us = timings.assembly.as_micros() as u64,
            solve_us = timings.solve.as_micros() as u64,
            coupling_us = timings.coupling.as_micros() as u64,
            "derivative complete"
        );
        self.timings = Some(timings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{CommunicationError, LocalCluster, SingleProcess};
    use crate::decomposition::CartesianTopology;
    use crate::error::DerivativeError;
    use crate::halo::BoundaryPolicy;
    use crate::solver::{CpuSolver, PreconditionError, SystemBatch};
    use crate::stencil::CompactScheme;
    use crate::types::{Extent3, GlobalGrid, Rank};

    fn single(n: usize, periodic: bool) -> Decomposition {
        let topology = CartesianTopology::new([1, 1, 1], [periodic; 3], 1).unwrap();
        Decomposition::new(GlobalGrid::cube(n), topology, 1).unwrap()
    }

    fn split_x() -> Decomposition {
        let topology = CartesianTopology::new([1, 1, 2], [true; 3], 2).unwrap();
        Decomposition::new(GlobalGrid::cube(8), topology, 1).unwrap()
    }

    fn on_one_rank<S: TridiagonalSolver>(
        decomp: Decomposition,
        config: DerivativeConfig,
        solver: S,
    ) -> Result<CompactDerivative<SingleProcess, S>> {
        CompactDerivative::new(SingleProcess::new(), decomp, config, solver)
    }

    /// Solver that always fails, for checking the stage reset.
    struct Failing;

    impl TridiagonalSolver for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn solve_batch(&self, _batch: &SystemBatch) -> Result<Vec<f64>> {
            Err(PreconditionError::NoStrictRow { system: 0 }.into())
        }
    }

    #[test]
    fn test_size_mismatch() {
        let topology = CartesianTopology::new([1, 1, 2], [true; 3], 2).unwrap();
        let decomp = Decomposition::new(GlobalGrid::cube(8), topology, 1).unwrap();
        let err = on_one_rank(decomp, DerivativeConfig::default(), CpuSolver::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            DerivativeError::Topology(TopologyError::SizeMismatch { size: 1, .. })
        ));
    }

    #[test]
    fn test_boundary_mismatch() {
        let config =
            DerivativeConfig::default().with_axis_boundary(Axis::Y, BoundaryPolicy::OneSided);
        let err = on_one_rank(single(8, true), config, CpuSolver::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            DerivativeError::Configuration(ConfigurationError::BoundaryMismatch {
                axis: Axis::Y,
                ..
            })
        ));
    }

    #[test]
    fn test_halo_too_narrow_for_pade6() {
        let config = DerivativeConfig::default().with_scheme(CompactScheme::Pade6);
        let err = on_one_rank(single(8, true), config, CpuSolver::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            DerivativeError::Configuration(ConfigurationError::HaloTooNarrow {
                required: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_field_shape_checked() {
        let mut d = on_one_rank(single(8, true), DerivativeConfig::default(), CpuSolver::new())
            .unwrap();
        let mut field = PaddedField::zeros(Extent3::new(8, 8, 4), 1);
        let err = d.derivative(Axis::X, &mut field).unwrap_err();
        assert!(matches!(
            err,
            DerivativeError::Configuration(ConfigurationError::FieldShape { .. })
        ));
        assert_eq!(d.stage(), RequestStage::Idle);
    }

    #[test]
    fn test_failure_resets_stage() {
        let mut d = on_one_rank(single(8, true), DerivativeConfig::default(), Failing).unwrap();
        let mut field = d.new_field();
        let err = d.derivative(Axis::Z, &mut field).unwrap_err();
        assert!(matches!(
            err,
            DerivativeError::Precondition(PreconditionError::NoStrictRow { .. })
        ));
        assert_eq!(d.stage(), RequestStage::Idle);
        assert!(d.last_timings().is_none());
    }

    #[test]
    fn test_silent_peer_times_out() {
        let mut comms = LocalCluster::with_timeout(2, Duration::from_millis(50));
        let silent = comms.pop().unwrap();
        let comm = comms.pop().unwrap();

        let config = DerivativeConfig::default();
        let mut d = CompactDerivative::new(comm, split_x(), config, CpuSolver::serial()).unwrap();
        let sub = d.subdomain().clone();
        let mut field = PaddedField::from_global_fn(&sub, |[_, _, gx]| gx as f64);

        let err = d.derivative(Axis::X, &mut field).unwrap_err();
        assert!(matches!(
            err,
            DerivativeError::Communication(CommunicationError::Timeout { from, .. })
                if from == Rank::new(1)
        ));
        assert_eq!(d.stage(), RequestStage::Idle);
        assert!(d.last_timings().is_none());
        drop(silent);
    }

    #[test]
    fn test_departed_peer_aborts_request() {
        let mut comms = LocalCluster::new(2);
        drop(comms.pop());
        let comm = comms.pop().unwrap();

        let config = DerivativeConfig::default();
        let mut d = CompactDerivative::new(comm, split_x(), config, CpuSolver::serial()).unwrap();
        let mut field = d.new_field();

        let err = d.derivative(Axis::X, &mut field).unwrap_err();
        assert!(matches!(
            err,
            DerivativeError::Communication(CommunicationError::Disconnected { peer })
                if peer == Rank::new(1)
        ));
        assert_eq!(d.stage(), RequestStage::Idle);
        assert!(d.last_timings().is_none());

        // Axes owned entirely by this rank still work
        assert!(d.derivative(Axis::Z, &mut field).is_ok());
    }

    #[test]
    fn test_constant_field_has_zero_gradient() {
        let mut d = on_one_rank(single(6, true), DerivativeConfig::default(), CpuSolver::new())
            .unwrap();
        let sub = d.subdomain().clone();
        let mut field = PaddedField::from_global_fn(&sub, |_| 3.5);
        for df in d.gradient(&mut field).unwrap() {
            assert!(df.max_abs() < 1e-14);
        }
        assert!(d.last_timings().is_some());
        assert_eq!(d.stage(), RequestStage::Idle);
    }

    #[test]
    fn test_two_ranks_linear_one_sided() {
        let results = LocalCluster::run(2, |comm| {
            let topology = CartesianTopology::new([1, 1, 2], [false; 3], 2).unwrap();
            let decomp = Decomposition::new(GlobalGrid::new(4, 4, 8), topology, 1).unwrap();
            let config = DerivativeConfig::default()
                .with_boundary(BoundaryPolicy::OneSided)
                .with_spacing([1.0, 1.0, 0.5]);
            let mut d = CompactDerivative::new(comm, decomp, config, CpuSolver::serial()).unwrap();
            let sub = d.subdomain().clone();
            let mut field =
                PaddedField::from_global_fn(&sub, |[_, _, gx]| 3.0 * gx as f64 * 0.5 - 1.0);
            d.derivative(Axis::X, &mut field).unwrap()
        });

        for df in results {
            for &v in df.as_slice() {
                assert!((v - 3.0).abs() < 1e-12);
            }
        }
    }
}
