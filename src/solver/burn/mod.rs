//! Tridiagonal solves on a Burn tensor backend.
//!
//! Systems of a batch become the rows of a 2D tensor, so each step of the
//! Thomas algorithm is a handful of column-wise tensor operations over the
//! whole batch. Burn supports multiple backends:
//! - **CUDA**: NVIDIA GPUs (requires `burn-cuda` feature)
//! - **WGPU**: Cross-platform GPU (Vulkan/DX12/Metal, requires `burn-wgpu` feature)
//! - **NdArray**: CPU reference implementation (requires `burn-ndarray` feature)
//!
//! # Usage
//!
//! ```ignore
//! use cfd_rs::solver::{BurnSolver, TridiagonalSolver};
//! use burn_wgpu::Wgpu;
//!
//! let solver = BurnSolver::<Wgpu>::with_default_device();
//! let x = solver.solve_batch(&batch)?;
//! ```
//!
//! Small batches are usually faster on the host because of the transfer
//! overhead.

mod backend;
mod batched;
mod kernels;

pub use backend::{TridiagonalBackend, download, is_reduced_precision, upload};
pub use batched::BurnSolver;
pub use kernels::{thomas_per_system, thomas_uniform};
