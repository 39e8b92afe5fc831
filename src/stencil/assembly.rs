//! Per-axis line systems.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{CompactScheme, RowKind};
use crate::error::{ConfigurationError, Result};
use crate::field::{Field3, PaddedField};
use crate::halo::BoundaryPolicy;
use crate::solver::{SolverError, SystemBatch, TridiagonalCoefficients};
use crate::types::{Axis, LineIndex, Side};

/// Smallest line a compact scheme accepts.
pub const MIN_SYSTEM_SIZE: usize = 2;

/// Smallest line on a rank carrying a one-sided boundary row.
pub const MIN_ONE_SIDED_SIZE: usize = 4;

/// The line operator of one rank along one axis.
///
/// Every line of the local block parallel to the axis shares the same
/// left-hand side, so the coefficients are built once. `a[0]` and
/// `c[n-1]` hold the coupling to the neighboring ranks' unknowns; they are
/// zero on a one-sided global edge.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStencil {
    axis: Axis,
    scheme: CompactScheme,
    spacing: f64,
    rows: Vec<RowKind>,
    coefficients: TridiagonalCoefficients,
}

impl AxisStencil {
    /// Build the line operator.
    ///
    /// `at_low_edge` / `at_high_edge` tell whether the rank owns the first /
    /// last point of the global line. They only matter for
    /// [`BoundaryPolicy::OneSided`].
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::InvalidSpacing`] for a non-positive spacing
    /// - [`ConfigurationError::ExtentTooSmall`] for lines shorter than
    ///   [`MIN_SYSTEM_SIZE`], or shorter than [`MIN_ONE_SIDED_SIZE`] on a
    ///   one-sided edge
    pub fn new(
        axis: Axis,
        scheme: CompactScheme,
        policy: BoundaryPolicy,
        spacing: f64,
        system_size: usize,
        at_low_edge: bool,
        at_high_edge: bool,
    ) -> std::result::Result<Self, ConfigurationError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(ConfigurationError::InvalidSpacing { axis, spacing });
        }

        let one_sided = !policy.is_periodic();
        let low = one_sided && at_low_edge;
        let high = one_sided && at_high_edge;
        let required = if low || high {
            MIN_ONE_SIDED_SIZE
        } else {
            MIN_SYSTEM_SIZE
        };
        if system_size < required {
            return Err(ConfigurationError::ExtentTooSmall {
                axis,
                extent: system_size,
                required,
            });
        }

        let n = system_size;
        let rows: Vec<RowKind> = (0..n)
            .map(|i| {
                if low && i == 0 {
                    RowKind::OneSided(Side::Low)
                } else if high && i == n - 1 {
                    RowKind::OneSided(Side::High)
                } else if (low && i == 1) || (high && i == n - 2) {
                    // The wide stencil would reach past the domain edge
                    RowKind::Compact(CompactScheme::Pade4)
                } else {
                    RowKind::Compact(scheme)
                }
            })
            .collect();

        let mut coefficients = TridiagonalCoefficients::constant(n, 0.0, 0.0, 0.0);
        for (i, row) in rows.iter().enumerate() {
            let (a, b, c) = row.lhs();
            coefficients.a[i] = a;
            coefficients.b[i] = b;
            coefficients.c[i] = c;
        }

        Ok(Self {
            axis,
            scheme,
            spacing,
            rows,
            coefficients,
        })
    }

    /// Axis the lines run along.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Interior scheme.
    #[inline]
    pub fn scheme(&self) -> CompactScheme {
        self.scheme
    }

    /// Grid spacing along the axis.
    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Unknowns per line.
    #[inline]
    pub fn system_size(&self) -> usize {
        self.rows.len()
    }

    /// Row relations, one per line position.
    #[inline]
    pub fn rows(&self) -> &[RowKind] {
        &self.rows
    }

    /// Shared left-hand side.
    #[inline]
    pub fn coefficients(&self) -> &TridiagonalCoefficients {
        &self.coefficients
    }

    /// Coupling `a[0]` to the last unknown of the low neighbor.
    #[inline]
    pub fn low_coupling(&self) -> f64 {
        self.coefficients.a[0]
    }

    /// Coupling `c[n-1]` to the first unknown of the high neighbor.
    #[inline]
    pub fn high_coupling(&self) -> f64 {
        self.coefficients.c[self.rows.len() - 1]
    }

    /// Fill the right-hand side of one line.
    fn line_rhs(&self, data: &[f64], start: usize, stride: usize, halo: usize, out: &mut [f64]) {
        let n = self.rows.len() as isize;
        let h = halo as isize;
        let value = |t: isize| data[start + ((t + h) as usize) * stride];
        for (i, (row, r)) in self.rows.iter().zip(out.iter_mut()).enumerate() {
            *r = row.rhs(value, i as isize, n, self.spacing);
        }
    }
}

/// Build the batch of line systems of `field` along the stencil's axis.
///
/// There is one system per line, ordered row-major over the two remaining
/// axes. The halo of `field` along the axis must be current.
///
/// # Errors
///
/// - [`ConfigurationError::FieldShape`] if the field's extent along the
///   axis differs from the stencil
/// - [`ConfigurationError::HaloTooNarrow`] if the field's halo cannot hold
///   the scheme's reach
pub fn assemble(field: &PaddedField, stencil: &AxisStencil) -> Result<SystemBatch> {
    let axis = stencil.axis();
    let extent = field.extent();
    let n = stencil.system_size();
    if extent.get(axis) != n {
        let mut expected = extent.to_array();
        expected[axis.index()] = n;
        return Err(ConfigurationError::field_shape(expected.into(), extent).into());
    }
    let required = stencil.scheme().halo_width();
    if field.halo() < required {
        return Err(ConfigurationError::HaloTooNarrow {
            scheme: stencil.scheme().name(),
            required,
            actual: field.halo(),
        }
        .into());
    }

    let num_systems = extent.line_count(axis);
    let mut rhs = vec![0.0; num_systems * n];
    let data = field.as_slice();
    let halo = field.halo();
    let fill = |(line, out): (usize, &mut [f64])| {
        let (start, stride) = field.line_offsets(axis, LineIndex::new(line));
        stencil.line_rhs(data, start, stride, halo, out);
    };

    #[cfg(feature = "parallel")]
    rhs.par_chunks_mut(n).enumerate().for_each(fill);
    #[cfg(not(feature = "parallel"))]
    rhs.chunks_mut(n).enumerate().for_each(fill);

    Ok(SystemBatch::uniform(
        stencil.coefficients().clone(),
        rhs,
        num_systems,
    )?)
}

/// Write solved lines along `axis` back into `out`.
///
/// `solution` is laid out like the right-hand side of [`assemble`].
///
/// # Errors
///
/// [`SolverError::Shape`] if `solution` does not cover `out`.
pub fn scatter_lines(
    solution: &[f64],
    axis: Axis,
    out: &mut Field3,
) -> std::result::Result<(), SolverError> {
    let extent = out.extent();
    if solution.len() != extent.len() {
        return Err(SolverError::shape("solution", extent.len(), solution.len()));
    }
    let n = extent.get(axis);
    if n == 0 {
        return Ok(());
    }

    let [p, q] = axis.others();
    let nq = extent.get(q);
    let strides = extent.strides();
    let data = out.as_mut_slice();
    for (line, values) in solution.chunks(n).enumerate() {
        let base = (line / nq) * strides[p.index()] + (line % nq) * strides[q.index()];
        let stride = strides[axis.index()];
        for (t, &v) in values.iter().enumerate() {
            data[base + t * stride] = v;
        }
    }
    Ok(())
}
