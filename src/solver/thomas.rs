//! Thomas algorithm kernels.
//!
//! The solve of one system is split into two passes so that the modified
//! super-diagonal can be shared between systems with identical
//! coefficients:
//!
//! 1. [`eliminate`]: `c2[0] = c[0] / b[0]`,
//!    `c2[i] = c[i] / (b[i] - a[i] c2[i-1])`
//! 2. [`sweep`]: forward sweep over the right-hand side followed by back
//!    substitution into the solution
//!
//! No pivoting is performed. The kernels are only stable for diagonally
//! dominant systems; see [`PreconditionCheck`](super::PreconditionCheck).

/// Compute the modified super-diagonal `c2` from `(a, b, c)`.
///
/// The textbook recurrence also defines
/// `c2[n-1] = c[n-1] / (b[n-1] - a[n-1] c2[n-2])`. That value is never read:
/// back substitution starts from `x[n-1] = d[n-1]` and every pivot uses
/// `c2[i-1]` with `i < n`. It is stored as zero instead, so the solution is
/// the same and `c[n-1]` is ignored.
///
/// # Panics
///
/// Panics (debug builds) if the slices have different lengths.
pub fn eliminate(a: &[f64], b: &[f64], c: &[f64], c2: &mut [f64]) {
    let n = b.len();
    debug_assert!(a.len() == n && c.len() == n && c2.len() == n);
    if n == 0 {
        return;
    }

    c2[n - 1] = 0.0;
    if n == 1 {
        return;
    }
    c2[0] = c[0] / b[0];
    for i in 1..n - 1 {
        c2[i] = c[i] / (b[i] - a[i] * c2[i - 1]);
    }
}

/// Pivot of row `i` once rows `0..i` have been eliminated.
#[inline]
pub fn pivot(a: &[f64], b: &[f64], c2: &[f64], i: usize) -> f64 {
    if i == 0 { b[0] } else { b[i] - a[i] * c2[i - 1] }
}

/// Forward sweep over `d` (in place) and back substitution into `x`.
///
/// `c2` must come from [`eliminate`] on the same `(a, b, c)`.
pub fn sweep(a: &[f64], b: &[f64], c2: &[f64], d: &mut [f64], x: &mut [f64]) {
    let n = d.len();
    debug_assert!(x.len() == n && b.len() == n);
    if n == 0 {
        return;
    }

    d[0] /= b[0];
    for i in 1..n {
        d[i] = (d[i] - a[i] * d[i - 1]) / (b[i] - a[i] * c2[i - 1]);
    }

    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c2[i] * x[i + 1];
    }
}

/// Solve a single tridiagonal system.
///
/// # Example
///
/// ```
/// use cfd_rs::solver::thomas::thomas_solve;
///
/// // [2 1 0; 1 2 1; 0 1 2] x = [3, 4, 3]  =>  x = [1, 1, 1]
/// let x = thomas_solve(&[0.0, 1.0, 1.0], &[2.0; 3], &[1.0, 1.0, 0.0], &[3.0, 4.0, 3.0]);
/// for xi in x {
///     assert!((xi - 1.0).abs() < 1e-14);
/// }
/// ```
pub fn thomas_solve(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut c2 = vec![0.0; n];
    let mut rhs = d.to_vec();
    let mut x = vec![0.0; n];
    eliminate(a, b, c, &mut c2);
    sweep(a, b, &c2, &mut rhs, &mut x);
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_unknown() {
        let x = thomas_solve(&[7.0], &[4.0], &[9.0], &[2.0]);
        assert_eq!(x, vec![0.5]);
    }

    #[test]
    fn test_diagonal_system() {
        let x = thomas_solve(&[0.0; 4], &[1.0, 2.0, 4.0, 8.0], &[0.0; 4], &[1.0; 4]);
        assert_eq!(x, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_edge_terms_ignored() {
        let a = [0.0, 0.25, 0.25, 0.25];
        let c = [0.25, 0.25, 0.25, 0.0];
        let mut a_dirty = a;
        let mut c_dirty = c;
        a_dirty[0] = 100.0;
        c_dirty[3] = -100.0;
        let d = [1.0, -2.0, 3.0, 0.5];
        let b = [1.0; 4];
        assert_eq!(thomas_solve(&a, &b, &c, &d), thomas_solve(&a_dirty, &b, &c_dirty, &d));
    }

    #[test]
    fn test_known_solution() {
        // Padé-like operator applied to x = [1, 2, 3, 4, 5]
        let n = 5;
        let a = vec![0.25; n];
        let b = vec![1.0; n];
        let c = vec![0.25; n];
        let expected = [1.0, 2.0, 3.0, 4.0, 5.0];
        let d: Vec<f64> = (0..n)
            .map(|i| {
                let mut v = expected[i];
                if i > 0 {
                    v += 0.25 * expected[i - 1];
                }
                if i + 1 < n {
                    v += 0.25 * expected[i + 1];
                }
                v
            })
            .collect();

        let x = thomas_solve(&a, &b, &c, &d);
        for (xi, ei) in x.iter().zip(expected) {
            assert_relative_eq!(*xi, ei, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_pivots_match_elimination() {
        let a = [0.0, 1.0, 1.0];
        let b = [4.0, 4.0, 4.0];
        let c = [1.0, 1.0, 0.0];
        let mut c2 = [0.0; 3];
        eliminate(&a, &b, &c, &mut c2);
        assert_eq!(pivot(&a, &b, &c2, 0), 4.0);
        assert_relative_eq!(pivot(&a, &b, &c2, 1), 3.75);
        assert_relative_eq!(pivot(&a, &b, &c2, 2), 4.0 - 1.0 / 3.75);
        assert_eq!(c2[2], 0.0);
    }

    #[test]
    fn test_last_modified_coefficient_unused() {
        let a = [0.0, 1.0, 1.0, 1.0];
        let b = [4.0, 5.0, 4.0, 6.0];
        let c = [1.0, 1.0, 1.0, 2.0];
        let d = [1.0, 2.0, -1.0, 3.0];

        let mut c2 = [0.0; 4];
        eliminate(&a, &b, &c, &mut c2);
        let mut rhs = d;
        let mut x = [0.0; 4];
        sweep(&a, &b, &c2, &mut rhs, &mut x);

        let mut textbook = c2;
        textbook[3] = c[3] / pivot(&a, &b, &c2, 3);
        let mut rhs = d;
        let mut y = [0.0; 4];
        sweep(&a, &b, &textbook, &mut rhs, &mut y);

        assert_eq!(x, y);
    }
}
