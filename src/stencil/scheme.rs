//! Compact (Padé) first-derivative schemes.
//!
//! Interior rows of every scheme read
//!
//! ```text
//! α f'[i-1] + f'[i] + α f'[i+1] = w1 (f[i+1] - f[i-1]) / Δ + w2 (f[i+2] - f[i-2]) / Δ
//! ```
//!
//! | Scheme  | α   | w1  | w2   | order | halo |
//! |---------|-----|-----|------|-------|------|
//! | `Pade4` | 1/4 | 3/4 | 0    | 4     | 1    |
//! | `Pade6` | 1/3 | 7/9 | 1/36 | 6     | 2    |

use std::fmt;

use crate::types::Side;

/// A tridiagonal compact scheme for the first derivative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompactScheme {
    /// Fourth-order Padé scheme.
    #[default]
    Pade4,
    /// Sixth-order Padé scheme.
    Pade6,
}

impl CompactScheme {
    /// Formal order of accuracy of the interior rows.
    pub const fn order(self) -> usize {
        match self {
            CompactScheme::Pade4 => 4,
            CompactScheme::Pade6 => 6,
        }
    }

    /// Halo width the right-hand side reads across a subdomain face.
    pub const fn halo_width(self) -> usize {
        match self {
            CompactScheme::Pade4 => 1,
            CompactScheme::Pade6 => 2,
        }
    }

    /// Short name for logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            CompactScheme::Pade4 => "pade4",
            CompactScheme::Pade6 => "pade6",
        }
    }

    /// Off-diagonal weight `α` of the left-hand side.
    pub const fn alpha(self) -> f64 {
        match self {
            CompactScheme::Pade4 => 0.25,
            CompactScheme::Pade6 => 1.0 / 3.0,
        }
    }

    /// Right-hand side weights `(w1, w2)`.
    pub const fn rhs_weights(self) -> (f64, f64) {
        match self {
            CompactScheme::Pade4 => (0.75, 0.0),
            CompactScheme::Pade6 => (7.0 / 9.0, 1.0 / 36.0),
        }
    }
}

impl fmt::Display for CompactScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relation used by one row of a line system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// Implicit compact relation.
    Compact(CompactScheme),
    /// Explicit third-order one-sided difference at a global domain edge.
    OneSided(Side),
}

impl RowKind {
    /// Left-hand side `(a, b, c)` of the row.
    pub const fn lhs(self) -> (f64, f64, f64) {
        match self {
            RowKind::Compact(scheme) => (scheme.alpha(), 1.0, scheme.alpha()),
            RowKind::OneSided(_) => (0.0, 1.0, 0.0),
        }
    }

    /// Right-hand side of row `i` of a line of `n` points.
    ///
    /// `f(t)` returns the field at line position `t`; compact rows read
    /// `t` in `i-2..=i+2`, which may fall into the halo.
    #[inline]
    pub fn rhs<F>(self, f: F, i: isize, n: isize, dx: f64) -> f64
    where
        F: Fn(isize) -> f64,
    {
        match self {
            RowKind::Compact(scheme) => {
                let (w1, w2) = scheme.rhs_weights();
                let mut r = w1 * (f(i + 1) - f(i - 1));
                if w2 != 0.0 {
                    r += w2 * (f(i + 2) - f(i - 2));
                }
                r / dx
            }
            RowKind::OneSided(Side::Low) => {
                (-11.0 * f(0) + 18.0 * f(1) - 9.0 * f(2) + 2.0 * f(3)) / (6.0 * dx)
            }
            RowKind::OneSided(Side::High) => {
                (11.0 * f(n - 1) - 18.0 * f(n - 2) + 9.0 * f(n - 3) - 2.0 * f(n - 4)) / (6.0 * dx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interior_rows_exact_for_quartic() {
        // Both schemes differentiate polynomials up to degree 4 exactly
        let f = |x: f64| x.powi(4) - 2.0 * x.powi(3) + x;
        let df = |x: f64| 4.0 * x.powi(3) - 6.0 * x.powi(2) + 1.0;
        let dx = 0.1;
        let i = 5isize;
        let at = |t: isize| f(t as f64 * dx);

        for scheme in [CompactScheme::Pade4, CompactScheme::Pade6] {
            let row = RowKind::Compact(scheme);
            let (a, b, c) = row.lhs();
            let x = |t: isize| t as f64 * dx;
            let lhs = a * df(x(i - 1)) + b * df(x(i)) + c * df(x(i + 1));
            assert_relative_eq!(lhs, row.rhs(at, i, 10, dx), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_one_sided_exact_for_cubic() {
        let f = |x: f64| 3.0 * x.powi(3) - x * x + 2.0;
        let df = |x: f64| 9.0 * x * x - 2.0 * x;
        let dx = 0.25;
        let n = 6isize;
        let at = |t: isize| f(t as f64 * dx);

        let low = RowKind::OneSided(Side::Low).rhs(at, 0, n, dx);
        let high = RowKind::OneSided(Side::High).rhs(at, n - 1, n, dx);
        assert_relative_eq!(low, df(0.0), epsilon = 1e-12);
        assert_relative_eq!(high, df((n - 1) as f64 * dx), epsilon = 1e-12);
    }

    #[test]
    fn test_scheme_metadata() {
        assert_eq!(CompactScheme::default(), CompactScheme::Pade4);
        assert_eq!(CompactScheme::Pade6.halo_width(), 2);
        assert_eq!(CompactScheme::Pade6.order(), 6);
        assert_eq!(CompactScheme::Pade4.to_string(), "pade4");
        assert_eq!(RowKind::OneSided(Side::High).lhs(), (0.0, 1.0, 0.0));
    }
}
