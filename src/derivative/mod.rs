//! Distributed compact derivatives.
//!
//! [`CompactDerivative`] sequences halo exchange, stencil assembly, the
//! batched tridiagonal solve and the coupling of line solutions across
//! ranks. [`InterfaceCoupling`] makes the distributed result equal to a
//! single compact solve over the whole global line.

mod config;
mod interface;
mod orchestrator;

pub use config::DerivativeConfig;
pub use interface::{InterfaceCoupling, interface_tag};
pub use orchestrator::{CompactDerivative, RequestStage, StageTimings};
