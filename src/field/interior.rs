//! Interior-only 3D field.

use crate::types::Extent3;

/// A scalar field on the interior points of a local block, no halo.
#[derive(Clone, Debug, PartialEq)]
pub struct Field3 {
    extent: Extent3,
    data: Vec<f64>,
}

impl Field3 {
    /// Zero field of the given extent.
    pub fn zeros(extent: Extent3) -> Self {
        Self {
            extent,
            data: vec![0.0; extent.len()],
        }
    }

    /// Field with `f(k, j, i)` at every point.
    pub fn from_fn<F>(extent: Extent3, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(extent.len());
        for k in 0..extent.nz {
            for j in 0..extent.ny {
                for i in 0..extent.nx {
                    data.push(f(k, j, i));
                }
            }
        }
        Self { extent, data }
    }

    /// Wrap row-major values.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != extent.len()`.
    pub fn from_vec(extent: Extent3, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            extent.len(),
            "data length {} does not match extent {}",
            data.len(),
            extent
        );
        Self { extent, data }
    }

    /// Extent of the field.
    #[inline]
    pub fn extent(&self) -> Extent3 {
        self.extent
    }

    /// Value at `(k, j, i)`.
    #[inline]
    pub fn get(&self, k: usize, j: usize, i: usize) -> f64 {
        self.data[self.extent.linear(k, j, i)]
    }

    /// Set the value at `(k, j, i)`.
    #[inline]
    pub fn set(&mut self, k: usize, j: usize, i: usize, value: f64) {
        let idx = self.extent.linear(k, j, i);
        self.data[idx] = value;
    }

    /// Row-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major values.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume into row-major values.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Maximum absolute value.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    /// Maximum absolute pointwise difference to `other`.
    ///
    /// # Panics
    ///
    /// Panics if the extents differ.
    pub fn max_abs_diff(&self, other: &Field3) -> f64 {
        assert_eq!(self.extent, other.extent, "extent mismatch");
        self.data
            .iter()
            .zip(&other.data)
            .fold(0.0, |m, (a, b)| m.max((a - b).abs()))
    }
}
