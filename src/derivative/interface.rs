//! Coupling of line solutions across subdomain faces.
//!
//! Each rank solves its part of a grid line with the neighbor unknowns
//! `x[-1]` and `x[n]` moved to the right-hand side:
//!
//! ```text
//! T x = d - a[0] x[-1] e[0] - c[n-1] x[n] e[n-1]
//! ```
//!
//! With `r = T⁻¹ d`, `u = T⁻¹(-a[0] e[0])` and `l = T⁻¹(-c[n-1] e[n-1])`
//! the local solution is `x = r + x[-1] u + x[n] l`. The unknowns left are
//! the first and last value of every rank on the line. Writing those for
//! all `P` ranks gives a dense `2P × 2P` system, the same for every line
//! of the batch. Each rank gathers the end values of the others, solves the
//! reduced system with an LU factorization and corrects its own lines.

use faer::{Mat, linalg::solvers::Solve};
use tracing::trace;

use crate::comm::{CommunicationError, Communicator, Tag};
use crate::decomposition::CartesianTopology;
use crate::error::Result;
use crate::solver::{PreconditionError, thomas};
use crate::stencil::AxisStencil;
use crate::types::{Axis, Rank};

const INTERFACE_TAG_BASE: Tag = 200;

/// Values each rank contributes before the per-line end values.
const HEADER_LEN: usize = 4;

/// Tag of the interface gather along `axis`.
#[inline]
pub fn interface_tag(axis: Axis) -> Tag {
    INTERFACE_TAG_BASE + axis.index() as Tag
}

/// Precomputed interface coupling of one rank along one axis.
#[derive(Clone, Debug)]
pub struct InterfaceCoupling {
    axis: Axis,
    /// Ranks along the line, ordered by coordinate
    line: Vec<Rank>,
    /// Position of this rank in `line`
    position: usize,
    periodic: bool,
    /// Response to the low neighbor's last unknown
    low_response: Vec<f64>,
    /// Response to the high neighbor's first unknown
    high_response: Vec<f64>,
}

impl InterfaceCoupling {
    /// Prepare the coupling of `rank` for lines built with `stencil`.
    pub fn new(stencil: &AxisStencil, topology: &CartesianTopology, rank: Rank) -> Self {
        let axis = stencil.axis();
        let n = stencil.system_size();
        let coeffs = stencil.coefficients();

        let response = |row: usize, coupling: f64| {
            if coupling == 0.0 {
                return vec![0.0; n];
            }
            let mut rhs = vec![0.0; n];
            rhs[row] = -coupling;
            thomas::thomas_solve(&coeffs.a, &coeffs.b, &coeffs.c, &rhs)
        };

        Self {
            axis,
            line: topology.line_ranks(rank, axis),
            position: topology.coords(rank)[axis.index()],
            periodic: topology.is_periodic(axis),
            low_response: response(0, stencil.low_coupling()),
            high_response: response(n - 1, stencil.high_coupling()),
        }
    }

    /// Axis of the coupled lines.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of ranks sharing a line.
    pub fn ranks_per_line(&self) -> usize {
        self.line.len()
    }

    /// True if the lines have no neighbors to couple to.
    pub fn is_trivial(&self) -> bool {
        self.line.len() == 1 && !self.periodic
    }

    /// Index of the previous rank's last unknown in the reduced system.
    fn prev(&self, p: usize) -> Option<usize> {
        let parts = self.line.len();
        if p > 0 {
            Some(2 * (p - 1) + 1)
        } else if self.periodic {
            Some(2 * (parts - 1) + 1)
        } else {
            None
        }
    }

    /// Index of the next rank's first unknown in the reduced system.
    fn next(&self, p: usize) -> Option<usize> {
        let parts = self.line.len();
        if p + 1 < parts {
            Some(2 * (p + 1))
        } else if self.periodic {
            Some(0)
        } else {
            None
        }
    }

    /// Turn the local line solutions `solution` into the global ones.
    ///
    /// Collective over the ranks of the line: every one of them must call
    /// this with the same number of lines.
    ///
    /// # Errors
    ///
    /// - [`CommunicationError`] if the gather fails
    /// - [`PreconditionError::SingularInterface`] if the reduced system has
    ///   no finite solution
    pub fn apply<C: Communicator>(&self, comm: &C, solution: &mut [f64]) -> Result<()> {
        if self.is_trivial() {
            return Ok(());
        }

        let n = self.low_response.len();
        let lines = solution.len() / n;
        let payloads = self.gather(comm, self.payload(solution, n))?;
        let coupled = self.solve_reduced(&payloads, lines)?;

        let p = self.position;
        let prev = self.prev(p);
        let next = self.next(p);
        for (line, x) in solution.chunks_mut(n).enumerate() {
            let x_low = prev.map_or(0.0, |idx| coupled[(idx, line)]);
            let x_high = next.map_or(0.0, |idx| coupled[(idx, line)]);
            for ((xi, u), l) in x.iter_mut().zip(&self.low_response).zip(&self.high_response) {
                *xi += x_low * u + x_high * l;
            }
        }

        trace!(
            rank = comm.rank().get(),
            axis = %self.axis,
            ranks = self.line.len(),
            lines,
            "interface coupling applied"
        );
        Ok(())
    }

    /// `[u0, u(n-1), l0, l(n-1)]` followed by `(r0, r(n-1))` per line.
    fn payload(&self, solution: &[f64], n: usize) -> Vec<f64> {
        let (u, l) = (&self.low_response, &self.high_response);
        let mut payload = Vec::with_capacity(HEADER_LEN + 2 * solution.len() / n);
        payload.extend_from_slice(&[u[0], u[n - 1], l[0], l[n - 1]]);
        for x in solution.chunks(n) {
            payload.push(x[0]);
            payload.push(x[n - 1]);
        }
        payload
    }

    /// Collect the payload of every rank on the line, indexed by position.
    ///
    /// Ring schedule: in round `k` each rank sends to the rank `k` places
    /// ahead and receives from the rank `k` places behind.
    fn gather<C: Communicator>(&self, comm: &C, own: Vec<f64>) -> Result<Vec<Vec<f64>>> {
        let parts = self.line.len();
        let p = self.position;
        let tag = interface_tag(self.axis);
        let mut payloads = vec![Vec::new(); parts];

        for k in 1..parts {
            let dest = self.line[(p + k) % parts];
            let src_pos = (p + parts - k) % parts;
            let src = self.line[src_pos];
            let received = comm.sendrecv(Some((dest, own.as_slice())), Some(src), tag)?;
            let values = received.ok_or(CommunicationError::Disconnected { peer: src })?;
            if values.len() != own.len() {
                return Err(CommunicationError::LengthMismatch {
                    from: src,
                    expected: own.len(),
                    actual: values.len(),
                }
                .into());
            }
            payloads[src_pos] = values;
        }
        payloads[p] = own;
        Ok(payloads)
    }

    /// Assemble and solve the reduced system for all lines at once.
    fn solve_reduced(&self, payloads: &[Vec<f64>], lines: usize) -> Result<Mat<f64>> {
        let parts = self.line.len();
        let size = 2 * parts;
        let mut matrix = Mat::<f64>::identity(size, size);
        let mut rhs = Mat::<f64>::zeros(size, lines);

        for (q, payload) in payloads.iter().enumerate() {
            let [u0, un, l0, ln] = [payload[0], payload[1], payload[2], payload[3]];
            let (first, last) = (2 * q, 2 * q + 1);
            if let Some(prev) = self.prev(q) {
                matrix[(first, prev)] -= u0;
                matrix[(last, prev)] -= un;
            }
            if let Some(next) = self.next(q) {
                matrix[(first, next)] -= l0;
                matrix[(last, next)] -= ln;
            }
            for line in 0..lines {
                rhs[(first, line)] = payload[HEADER_LEN + 2 * line];
                rhs[(last, line)] = payload[HEADER_LEN + 2 * line + 1];
            }
        }

        let lu = matrix.as_ref().full_piv_lu();
        let coupled = lu.solve(&rhs);

        for line in 0..lines {
            for row in 0..size {
                if !coupled[(row, line)].is_finite() {
                    return Err(PreconditionError::SingularInterface { axis: self.axis }.into());
                }
            }
        }
        Ok(coupled)
    }
}
