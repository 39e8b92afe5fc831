//! Applicability checks for the Thomas algorithm.

use tracing::warn;

use super::{PreconditionError, thomas};

/// Pivots smaller than this fraction of their diagonal entry are rejected.
pub const PIVOT_FLOOR: f64 = 64.0 * f64::EPSILON;

/// What to verify before a batch is solved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreconditionCheck {
    /// Solve whatever is handed in. Singular or badly conditioned systems
    /// produce non-finite values.
    Off,
    /// Require weak row diagonal dominance, strict in at least one row,
    /// and reject vanishing pivots.
    #[default]
    DiagonalDominance,
}

impl PreconditionCheck {
    /// True unless checks are disabled.
    #[inline]
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }

    /// Verify diagonal dominance of one system.
    ///
    /// `a[0]` and `c[n-1]` do not belong to the system and are ignored.
    pub fn check_dominance(
        self,
        system: usize,
        a: &[f64],
        b: &[f64],
        c: &[f64],
    ) -> Result<(), PreconditionError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let n = b.len();
        let mut strict = false;
        for row in 0..n {
            let lower = if row > 0 { a[row].abs() } else { 0.0 };
            let upper = if row + 1 < n { c[row].abs() } else { 0.0 };
            let diagonal = b[row].abs();
            let off_diagonal = lower + upper;
            if !(diagonal >= off_diagonal) {
                warn!(
                    system,
                    row,
                    diagonal,
                    off_diagonal,
                    "tridiagonal row not diagonally dominant"
                );
                return Err(PreconditionError::NotDiagonallyDominant {
                    system,
                    row,
                    diagonal,
                    off_diagonal,
                });
            }
            strict |= diagonal > off_diagonal;
        }

        if n > 0 && !strict {
            warn!(system, "tridiagonal system has no strictly dominant row");
            return Err(PreconditionError::NoStrictRow { system });
        }
        Ok(())
    }

    /// Verify that no elimination pivot vanishes.
    ///
    /// `c2` must come from [`thomas::eliminate`].
    pub fn check_pivots(
        self,
        system: usize,
        a: &[f64],
        b: &[f64],
        c2: &[f64],
    ) -> Result<(), PreconditionError> {
        if !self.is_enabled() {
            return Ok(());
        }

        for row in 0..b.len() {
            let pivot = thomas::pivot(a, b, c2, row);
            if !pivot.is_finite() || pivot.abs() <= PIVOT_FLOOR * b[row].abs() {
                warn!(system, row, pivot, "vanishing pivot in tridiagonal elimination");
                return Err(PreconditionError::VanishingPivot { system, row, pivot });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_enabled() {
        assert!(PreconditionCheck::default().is_enabled());
        assert!(!PreconditionCheck::Off.is_enabled());
    }

    #[test]
    fn test_pade_rows_pass() {
        let n = 6;
        let check = PreconditionCheck::DiagonalDominance;
        assert!(check.check_dominance(0, &vec![0.25; n], &vec![1.0; n], &vec![0.25; n]).is_ok());
    }

    #[test]
    fn test_weak_row_rejected() {
        let check = PreconditionCheck::DiagonalDominance;
        let err = check
            .check_dominance(3, &[0.0, 1.0, 0.5], &[1.0, 1.0, 1.0], &[0.5, 0.5, 0.0])
            .unwrap_err();
        assert_eq!(
            err,
            PreconditionError::NotDiagonallyDominant {
                system: 3,
                row: 1,
                diagonal: 1.0,
                off_diagonal: 1.5,
            }
        );
    }

    #[test]
    fn test_edge_terms_do_not_count() {
        let check = PreconditionCheck::DiagonalDominance;
        // a[0] and c[n-1] are huge but outside the matrix
        assert!(check.check_dominance(0, &[9.0, 0.1], &[1.0, 1.0], &[0.1, 9.0]).is_ok());
    }

    #[test]
    fn test_no_strict_row_rejected() {
        // [1 -1; -1 1] is singular and only weakly dominant
        let check = PreconditionCheck::DiagonalDominance;
        let err = check.check_dominance(0, &[0.0, -1.0], &[1.0, 1.0], &[-1.0, 0.0]).unwrap_err();
        assert_eq!(err, PreconditionError::NoStrictRow { system: 0 });
    }

    #[test]
    fn test_vanishing_pivot_rejected() {
        let a = [0.0, 1.0];
        let b = [1.0, 1.0];
        let c = [1.0, 0.0];
        let mut c2 = [0.0; 2];
        thomas::eliminate(&a, &b, &c, &mut c2);
        let err = PreconditionCheck::DiagonalDominance
            .check_pivots(2, &a, &b, &c2)
            .unwrap_err();
        assert!(matches!(err, PreconditionError::VanishingPivot { system: 2, row: 1, .. }));
        assert!(PreconditionCheck::Off.check_pivots(2, &a, &b, &c2).is_ok());
    }

    #[test]
    fn test_off_skips_everything() {
        let check = PreconditionCheck::Off;
        assert!(check.check_dominance(0, &[0.0, 5.0], &[0.0, 0.0], &[5.0, 0.0]).is_ok());
    }
}
