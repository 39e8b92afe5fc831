//! Even partition of the global grid into per-rank subdomains.

use crate::error::{ConfigurationError, TopologyError};
use crate::types::{Axis, Extent3, GlobalGrid, Rank};

use super::CartesianTopology;

/// Partition of a [`GlobalGrid`] over a [`CartesianTopology`].
///
/// Every rank receives an interior block of identical extent
/// `(NZ/pz, NY/py, NX/px)`; uneven (remainder) partitioning is rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct Decomposition {
    grid: GlobalGrid,
    topology: CartesianTopology,
    halo: usize,
    local: Extent3,
}

/// The part of the global grid owned by one rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subdomain {
    /// Owning rank
    pub rank: Rank,
    /// Coordinates `[cz, cy, cx]` in the process grid
    pub coords: [usize; 3],
    /// Interior points along each axis
    pub extent: Extent3,
    /// Global index of the first interior point, `[z, y, x]`
    pub offset: [usize; 3],
    /// Halo width on every face
    pub halo: usize,
    /// Ranks along each axis `[pz, py, px]`
    pub parts: [usize; 3],
}

impl Decomposition {
    /// Partition `grid` over `topology` with a halo of width `halo`.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::ZeroHalo`] if `halo == 0`
    /// - [`ConfigurationError::UnevenPartition`] if an axis does not divide evenly
    /// - [`ConfigurationError::HaloTooWide`] if a local extent is below `halo`
    pub fn new(
        grid: GlobalGrid,
        topology: CartesianTopology,
        halo: usize,
    ) -> Result<Self, ConfigurationError> {
        if halo == 0 {
            return Err(ConfigurationError::ZeroHalo);
        }

        let mut local = [0usize; 3];
        for axis in Axis::ALL {
            let points = grid.points(axis);
            let parts = topology.parts(axis);
            if points % parts != 0 {
                return Err(ConfigurationError::UnevenPartition {
                    axis,
                    points,
                    parts,
                });
            }
            let extent = points / parts;
            if extent < halo {
                return Err(ConfigurationError::HaloTooWide { axis, extent, halo });
            }
            local[axis.index()] = extent;
        }

        Ok(Self {
            grid,
            topology,
            halo,
            local: Extent3::from_array(local),
        })
    }

    /// The global grid.
    #[inline]
    pub fn grid(&self) -> GlobalGrid {
        self.grid
    }

    /// The process topology.
    #[inline]
    pub fn topology(&self) -> &CartesianTopology {
        &self.topology
    }

    /// Halo width.
    #[inline]
    pub fn halo(&self) -> usize {
        self.halo
    }

    /// Interior extent shared by every rank.
    #[inline]
    pub fn local_extent(&self) -> Extent3 {
        self.local
    }

    /// Extent of a local block including halos.
    #[inline]
    pub fn padded_extent(&self) -> Extent3 {
        self.local.padded(self.halo)
    }

    /// Subdomain owned by `rank`.
    pub fn subdomain(&self, rank: Rank) -> Result<Subdomain, TopologyError> {
        self.topology.check_rank(rank)?;
        let coords = self.topology.coords(rank);
        let local = self.local.to_array();
        let offset = [
            coords[0] * local[0],
            coords[1] * local[1],
            coords[2] * local[2],
        ];
        Ok(Subdomain {
            rank,
            coords,
            extent: self.local,
            offset,
            halo: self.halo,
            parts: self.topology.dims(),
        })
    }

    /// All subdomains in rank order.
    pub fn subdomains(&self) -> Vec<Subdomain> {
        Rank::iter(self.topology.size())
            .filter_map(|rank| self.subdomain(rank).ok())
            .collect()
    }
}

impl Subdomain {
    /// Interior extent including halos.
    #[inline]
    pub fn padded_extent(&self) -> Extent3 {
        self.extent.padded(self.halo)
    }

    /// True if the low face along `axis` lies on the global domain boundary.
    #[inline]
    pub fn touches_low_boundary(&self, axis: Axis) -> bool {
        self.coords[axis.index()] == 0
    }

    /// True if the high face along `axis` lies on the global domain boundary.
    #[inline]
    pub fn touches_high_boundary(&self, axis: Axis) -> bool {
        self.coords[axis.index()] + 1 == self.parts[axis.index()]
    }

    /// Global index of local interior index `local` along `axis`.
    #[inline]
    pub fn global_index(&self, axis: Axis, local: usize) -> usize {
        self.offset[axis.index()] + local
    }

    /// Whether the global point `(gz, gy, gx)` is an interior point of this subdomain.
    pub fn owns(&self, global: [usize; 3]) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let a = axis.index();
            global[a] >= self.offset[a] && global[a] < self.offset[a] + self.extent.get(axis)
        })
    }
}
