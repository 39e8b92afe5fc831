//! # cfd-rs
//!
//! Distributed compact finite-difference derivatives on structured 3D grids.
//!
//! A compact (Padé) scheme couples the derivative at neighboring points, so
//! every grid line along the differentiation axis becomes a tridiagonal
//! system. This crate provides the pieces of the distributed pipeline:
//! - Cartesian domain decomposition with halos
//! - Halo exchange between neighboring ranks
//! - Stencil assembly (4th and 6th order Padé, one-sided boundary rows)
//! - Batched Thomas solves on the host (rayon) or a Burn device
//! - Interface coupling, so a split line gives the same result as a single
//!   global solve
//! - The derivative orchestrator tying it together
//!
//! Ranks talk through the [`comm::Communicator`] trait: threads of one
//! process ([`comm::LocalCluster`]) or MPI processes (feature `mpi`).

pub mod comm;
pub mod decomposition;
pub mod derivative;
pub mod error;
pub mod field;
pub mod halo;
pub mod solver;
pub mod stencil;
pub mod types;

// Re-export main types for convenience
pub use comm::{Communicator, LocalCluster, SingleProcess, ThreadComm};
#[cfg(feature = "mpi")]
pub use comm::MpiComm;
pub use decomposition::{CartesianTopology, Decomposition, Subdomain};
pub use derivative::{CompactDerivative, DerivativeConfig, RequestStage, StageTimings};
pub use error::{ConfigurationError, DerivativeError, Result, TopologyError};
pub use field::{Field3, PaddedField};
pub use halo::{BoundaryPolicy, exchange_all, exchange_halo};
pub use solver::{
    CpuSolver, PreconditionCheck, SystemBatch, TridiagonalCoefficients, TridiagonalSolver, solve,
};
#[cfg(feature = "burn")]
pub use solver::{BurnSolver, TridiagonalBackend};
pub use stencil::{AxisStencil, CompactScheme};
pub use types::{Axis, Bounds3D, Extent3, GlobalGrid, Rank};
