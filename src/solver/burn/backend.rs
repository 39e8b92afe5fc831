//! Backend abstraction for batched tridiagonal solves.
//!
//! This module provides the `TridiagonalBackend` trait that abstracts over
//! different Burn backends (CUDA, WGPU, NdArray).

use burn::prelude::*;
use burn::tensor::{ElementConversion, TensorData};

use crate::solver::DeviceError;

/// Trait for backends suitable for the tensor Thomas kernels.
pub trait TridiagonalBackend: Backend {
    /// Get the default device for this backend.
    fn default_device() -> Self::Device;
}

#[cfg(feature = "burn-ndarray")]
impl TridiagonalBackend for burn_ndarray::NdArray<f64> {
    fn default_device() -> Self::Device {
        burn_ndarray::NdArrayDevice::Cpu
    }
}

#[cfg(feature = "burn-ndarray")]
impl TridiagonalBackend for burn_ndarray::NdArray<f32> {
    fn default_device() -> Self::Device {
        burn_ndarray::NdArrayDevice::Cpu
    }
}

#[cfg(feature = "burn-wgpu")]
impl TridiagonalBackend for burn_wgpu::Wgpu {
    fn default_device() -> Self::Device {
        burn_wgpu::WgpuDevice::default()
    }
}

#[cfg(feature = "burn-cuda")]
impl TridiagonalBackend for burn_cuda::Cuda {
    fn default_device() -> Self::Device {
        burn_cuda::CudaDevice::default()
    }
}

/// True if the backend computes in less than double precision.
pub fn is_reduced_precision<B: Backend>() -> bool {
    std::mem::size_of::<B::FloatElem>() < std::mem::size_of::<f64>()
}

/// Upload a row-major `[rows, cols]` matrix.
pub fn upload<B: Backend>(
    data: &[f64],
    rows: usize,
    cols: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    let converted: Vec<B::FloatElem> = data.iter().map(|&v| v.elem()).collect();
    Tensor::from_data(TensorData::new(converted, [rows, cols]), device)
}

/// Download a 2D tensor to a row-major `Vec<f64>`.
pub fn download<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<f64>, DeviceError> {
    let values = tensor
        .into_data()
        .to_vec::<B::FloatElem>()
        .map_err(|e| DeviceError::DataTransfer(format!("{e:?}")))?;
    Ok(values.into_iter().map(|v| v.elem::<f64>()).collect())
}
