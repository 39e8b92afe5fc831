//! Batches of independent tridiagonal systems.
//!
//! A batch holds `num_systems` systems of `system_size` unknowns each. The
//! right-hand sides are stored row-major by system (system-major, then the
//! index within the system). Coefficients come in two layouts:
//!
//! - [`BatchCoefficients::Uniform`]: one `(a, b, c)` triplet shared by every
//!   system, as produced by a compact scheme on a uniform grid
//! - [`BatchCoefficients::PerSystem`]: a separate triplet per system, laid
//!   out like the right-hand sides
//!
//! Row `i` of system `s` reads
//! `a[i] x[s,i-1] + b[i] x[s,i] + c[i] x[s,i+1] = d[s,i]`, where `a[0]` and
//! `c[n-1]` are ignored.

use super::SolverError;

/// Sub-diagonal, diagonal and super-diagonal of a tridiagonal operator.
#[derive(Clone, Debug, PartialEq)]
pub struct TridiagonalCoefficients {
    /// Sub-diagonal (`a[0]` unused by the solver)
    pub a: Vec<f64>,
    /// Diagonal
    pub b: Vec<f64>,
    /// Super-diagonal (`c[n-1]` unused by the solver)
    pub c: Vec<f64>,
}

impl TridiagonalCoefficients {
    /// Create from the three diagonals.
    ///
    /// # Errors
    ///
    /// [`SolverError::Shape`] if the lengths differ.
    pub fn new(a: Vec<f64>, b: Vec<f64>, c: Vec<f64>) -> Result<Self, SolverError> {
        if a.len() != b.len() {
            return Err(SolverError::shape("sub-diagonal", b.len(), a.len()));
        }
        if c.len() != b.len() {
            return Err(SolverError::shape("super-diagonal", b.len(), c.len()));
        }
        Ok(Self { a, b, c })
    }

    /// Constant diagonals of length `n`.
    pub fn constant(n: usize, a: f64, b: f64, c: f64) -> Self {
        Self {
            a: vec![a; n],
            b: vec![b; n],
            c: vec![c; n],
        }
    }

    /// Length of the diagonals.
    #[inline]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// True if the diagonals are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Borrow the diagonals in `range`.
    #[inline]
    pub(crate) fn rows(&self, range: std::ops::Range<usize>) -> (&[f64], &[f64], &[f64]) {
        (&self.a[range.clone()], &self.b[range.clone()], &self.c[range])
    }
}

/// Coefficient layout of a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchCoefficients {
    /// One triplet of length `system_size` shared by all systems.
    Uniform(TridiagonalCoefficients),
    /// Triplets of length `num_systems * system_size`, system-major.
    PerSystem(TridiagonalCoefficients),
}

/// A batch of independent tridiagonal systems.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemBatch {
    coefficients: BatchCoefficients,
    rhs: Vec<f64>,
    num_systems: usize,
    system_size: usize,
}

impl SystemBatch {
    /// Batch whose systems all share `coefficients`.
    ///
    /// `system_size` is the length of the diagonals.
    ///
    /// # Example
    ///
    /// ```
    /// use cfd_rs::solver::{SystemBatch, TridiagonalCoefficients};
    ///
    /// let coeffs = TridiagonalCoefficients::constant(3, 0.25, 1.0, 0.25);
    /// let batch = SystemBatch::uniform(coeffs, vec![1.0; 6], 2).unwrap();
    /// assert_eq!(batch.num_systems(), 2);
    /// assert_eq!(batch.system_size(), 3);
    /// ```
    pub fn uniform(
        coefficients: TridiagonalCoefficients,
        rhs: Vec<f64>,
        num_systems: usize,
    ) -> Result<Self, SolverError> {
        let system_size = coefficients.len();
        Self::check_shape(&rhs, num_systems, system_size)?;
        Ok(Self {
            coefficients: BatchCoefficients::Uniform(coefficients),
            rhs,
            num_systems,
            system_size,
        })
    }

    /// Batch with separate coefficients for every system.
    pub fn per_system(
        coefficients: TridiagonalCoefficients,
        rhs: Vec<f64>,
        num_systems: usize,
        system_size: usize,
    ) -> Result<Self, SolverError> {
        Self::check_shape(&rhs, num_systems, system_size)?;
        let expected = num_systems * system_size;
        if coefficients.len() != expected {
            return Err(SolverError::shape("coefficients", expected, coefficients.len()));
        }
        Ok(Self {
            coefficients: BatchCoefficients::PerSystem(coefficients),
            rhs,
            num_systems,
            system_size,
        })
    }

    fn check_shape(rhs: &[f64], num_systems: usize, system_size: usize) -> Result<(), SolverError> {
        if system_size == 0 {
            return Err(SolverError::EmptySystem);
        }
        let expected = num_systems * system_size;
        if rhs.len() != expected {
            return Err(SolverError::shape("right-hand side", expected, rhs.len()));
        }
        Ok(())
    }

    /// Number of systems.
    #[inline]
    pub fn num_systems(&self) -> usize {
        self.num_systems
    }

    /// Unknowns per system.
    #[inline]
    pub fn system_size(&self) -> usize {
        self.system_size
    }

    /// Coefficient layout.
    #[inline]
    pub fn coefficients(&self) -> &BatchCoefficients {
        &self.coefficients
    }

    /// All right-hand sides, system-major.
    #[inline]
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Right-hand side of system `s`.
    #[inline]
    pub fn system_rhs(&self, s: usize) -> &[f64] {
        let n = self.system_size;
        &self.rhs[s * n..(s + 1) * n]
    }

    /// Diagonals `(a, b, c)` of system `s`.
    pub fn system_coefficients(&self, s: usize) -> (&[f64], &[f64], &[f64]) {
        match &self.coefficients {
            BatchCoefficients::Uniform(coeffs) => coeffs.rows(0..self.system_size),
            BatchCoefficients::PerSystem(coeffs) => {
                let n = self.system_size;
                coeffs.rows(s * n..(s + 1) * n)
            }
        }
    }

    /// Largest absolute residual `|a x[i-1] + b x[i] + c x[i+1] - d[i]|` over the batch.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have the shape of the right-hand side.
    pub fn max_residual(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.rhs.len(), "solution shape mismatch");
        let n = self.system_size;
        let mut worst = 0.0f64;
        for s in 0..self.num_systems {
            let (a, b, c) = self.system_coefficients(s);
            let xs = &x[s * n..(s + 1) * n];
            let ds = self.system_rhs(s);
            for i in 0..n {
                let mut lhs = b[i] * xs[i];
                if i > 0 {
                    lhs += a[i] * xs[i - 1];
                }
                if i + 1 < n {
                    lhs += c[i] * xs[i + 1];
                }
                worst = worst.max((lhs - ds[i]).abs());
            }
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_lengths_checked() {
        let err =
            TridiagonalCoefficients::new(vec![0.0; 2], vec![1.0; 3], vec![0.0; 3]).unwrap_err();
        assert_eq!(err, SolverError::shape("sub-diagonal", 3, 2));
    }

    #[test]
    fn test_rhs_length_checked() {
        let coeffs = TridiagonalCoefficients::constant(4, 0.0, 1.0, 0.0);
        let err = SystemBatch::uniform(coeffs, vec![0.0; 7], 2).unwrap_err();
        assert_eq!(err, SolverError::shape("right-hand side", 8, 7));
    }

    #[test]
    fn test_empty_system_rejected() {
        let coeffs = TridiagonalCoefficients::constant(0, 0.0, 1.0, 0.0);
        assert_eq!(
            SystemBatch::uniform(coeffs, Vec::new(), 3).unwrap_err(),
            SolverError::EmptySystem
        );
    }

    #[test]
    fn test_per_system_coefficients_checked() {
        let coeffs = TridiagonalCoefficients::constant(3, 0.0, 1.0, 0.0);
        let err = SystemBatch::per_system(coeffs, vec![0.0; 6], 2, 3).unwrap_err();
        assert_eq!(err, SolverError::shape("coefficients", 6, 3));
    }

    #[test]
    fn test_system_views() {
        let coeffs = TridiagonalCoefficients::new(
            vec![0.0, 1.0, 0.0, 2.0],
            vec![5.0, 5.0, 6.0, 6.0],
            vec![1.0, 0.0, 2.0, 0.0],
        )
        .unwrap();
        let batch = SystemBatch::per_system(coeffs, vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        assert_eq!(batch.system_rhs(1), &[3.0, 4.0]);
        let (a, b, c) = batch.system_coefficients(1);
        assert_eq!((a, b, c), (&[0.0, 2.0][..], &[6.0, 6.0][..], &[2.0, 0.0][..]));
    }

    #[test]
    fn test_residual_of_identity() {
        let coeffs = TridiagonalCoefficients::constant(3, 0.0, 1.0, 0.0);
        let batch = SystemBatch::uniform(coeffs, vec![1.0, 2.0, 3.0], 1).unwrap();
        assert_eq!(batch.max_residual(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(batch.max_residual(&[1.0, 2.0, 2.5]), 0.5);
    }
}
