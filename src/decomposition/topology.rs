//! Cartesian process topology.

use crate::error::TopologyError;
use crate::types::{Axis, AxisSides, Rank};

/// Assignment of ranks to coordinates `(pz, py, px)` of a 3D process grid.
///
/// Ranks are numbered row-major over the coordinates (z slowest), the same
/// ordering an MPI Cartesian communicator uses without reordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartesianTopology {
    dims: [usize; 3],
    periodic: [bool; 3],
}

impl CartesianTopology {
    /// Create a topology with `dims = [pz, py, px]` for `size` processes.
    ///
    /// # Errors
    ///
    /// [`TopologyError::ZeroExtent`] if any extent is zero and
    /// [`TopologyError::SizeMismatch`] if `pz * py * px != size`.
    pub fn new(dims: [usize; 3], periodic: [bool; 3], size: usize) -> Result<Self, TopologyError> {
        if dims.contains(&0) {
            return Err(TopologyError::ZeroExtent { dims });
        }
        let product = dims.iter().product::<usize>();
        if product != size {
            return Err(TopologyError::SizeMismatch {
                dims,
                product,
                size,
            });
        }
        Ok(Self { dims, periodic })
    }

    /// Factor `size` into three extents that are as close as possible.
    ///
    /// Extents are non-increasing from z to x.
    ///
    /// ```
    /// use cfd_rs::decomposition::CartesianTopology;
    ///
    /// let topo = CartesianTopology::balanced(12, [false; 3]).unwrap();
    /// assert_eq!(topo.dims(), [3, 2, 2]);
    /// ```
    pub fn balanced(size: usize, periodic: [bool; 3]) -> Result<Self, TopologyError> {
        if size == 0 {
            return Err(TopologyError::ZeroExtent { dims: [0; 3] });
        }

        let mut factors = Vec::new();
        let mut rest = size;
        let mut p = 2;
        while p * p <= rest {
            while rest % p == 0 {
                factors.push(p);
                rest /= p;
            }
            p += 1;
        }
        if rest > 1 {
            factors.push(rest);
        }

        // Largest factors first, each onto the currently smallest extent
        let mut dims = [1usize; 3];
        for &f in factors.iter().rev() {
            let smallest = (0..3).min_by_key(|&a| (dims[a], std::cmp::Reverse(a))).unwrap_or(2);
            dims[smallest] *= f;
        }
        dims.sort_unstable_by(|a, b| b.cmp(a));

        Self::new(dims, periodic, size)
    }

    /// Extents `[pz, py, px]`.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of ranks along `axis`.
    #[inline]
    pub fn parts(&self, axis: Axis) -> usize {
        self.dims[axis.index()]
    }

    /// Whether `axis` wraps around.
    #[inline]
    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.periodic[axis.index()]
    }

    /// Total number of ranks.
    #[inline]
    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }

    /// Check that `rank` belongs to this topology.
    pub fn check_rank(&self, rank: Rank) -> Result<(), TopologyError> {
        if rank.get() >= self.size() {
            return Err(TopologyError::RankOutOfRange {
                rank,
                size: self.size(),
            });
        }
        Ok(())
    }

    /// Coordinates `[cz, cy, cx]` of `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is out of range.
    pub fn coords(&self, rank: Rank) -> [usize; 3] {
        assert!(
            rank.get() < self.size(),
            "{} out of range for {} ranks",
            rank,
            self.size()
        );
        let [_, py, px] = self.dims;
        let r = rank.get();
        [r / (py * px), (r / px) % py, r % px]
    }

    /// Rank at coordinates `[cz, cy, cx]`.
    #[inline]
    pub fn rank_of(&self, coords: [usize; 3]) -> Rank {
        let [_, py, px] = self.dims;
        Rank::new((coords[0] * py + coords[1]) * px + coords[2])
    }

    /// Neighbors of `rank` along `axis`.
    ///
    /// On a periodic axis both neighbors always exist; with a single rank
    /// along that axis, the rank is its own neighbor. On a non-periodic axis
    /// the ranks at the domain edges have no neighbor on the outer side.
    ///
    /// ```
    /// use cfd_rs::decomposition::CartesianTopology;
    /// use cfd_rs::types::{Axis, Rank};
    ///
    /// let topo = CartesianTopology::new([1, 1, 3], [false, false, true], 3).unwrap();
    /// let n = topo.neighbors(Rank::new(0), Axis::X);
    /// assert_eq!(n.low, Some(Rank::new(2)));
    /// assert_eq!(n.high, Some(Rank::new(1)));
    /// ```
    pub fn neighbors(&self, rank: Rank, axis: Axis) -> AxisSides<Option<Rank>> {
        let coords = self.coords(rank);
        let a = axis.index();
        let parts = self.dims[a];
        let c = coords[a];

        let shifted = |target: usize| {
            let mut n = coords;
            n[a] = target;
            self.rank_of(n)
        };

        let low = if c > 0 {
            Some(shifted(c - 1))
        } else if self.periodic[a] {
            Some(shifted(parts - 1))
        } else {
            None
        };
        let high = if c + 1 < parts {
            Some(shifted(c + 1))
        } else if self.periodic[a] {
            Some(shifted(0))
        } else {
            None
        };

        AxisSides::new(low, high)
    }

    /// Ranks sharing the other two coordinates with `rank`, ordered along `axis`.
    pub fn line_ranks(&self, rank: Rank, axis: Axis) -> Vec<Rank> {
        let coords = self.coords(rank);
        let a = axis.index();
        (0..self.dims[a])
            .map(|c| {
                let mut n = coords;
                n[a] = c;
                self.rank_of(n)
            })
            .collect()
    }
}
