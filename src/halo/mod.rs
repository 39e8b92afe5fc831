//! Halo exchange along one axis.
//!
//! Before a stencil reads across a subdomain face, the halo on that face
//! must mirror the neighbor's boundary. An exchange along an axis runs in
//! two phases:
//!
//! 1. every rank sends its low boundary slab to the low neighbor and
//!    receives the high neighbor's low slab into its high halo
//! 2. every rank sends its high boundary slab to the high neighbor and
//!    receives the low neighbor's high slab into its low halo
//!
//! The call returns only after both receives have completed. On a
//! non-periodic axis the outer halo of an edge rank is left untouched; the
//! one-sided boundary closure never reads it.

use tracing::trace;

use crate::comm::{CommunicationError, Communicator, Tag};
use crate::decomposition::CartesianTopology;
use crate::field::PaddedField;
use crate::types::{Axis, Rank, Side};

/// Treatment of the global domain boundary along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BoundaryPolicy {
    /// The domain wraps; edge halos are filled from the opposite edge.
    #[default]
    Periodic,
    /// Non-periodic; edge rows use one-sided difference formulas.
    OneSided,
}

impl BoundaryPolicy {
    /// Whether the axis wraps around.
    #[inline]
    pub fn is_periodic(self) -> bool {
        matches!(self, BoundaryPolicy::Periodic)
    }
}

const HALO_TAG_BASE: Tag = 100;

/// Tag of a boundary slab leaving through `side` of `axis`.
#[inline]
pub fn halo_tag(axis: Axis, side: Side) -> Tag {
    let side = match side {
        Side::Low => 0,
        Side::High => 1,
    };
    HALO_TAG_BASE + 2 * axis.index() as Tag + side
}

/// Refresh the halos of `field` on both faces normal to `axis`.
///
/// # Errors
///
/// Any transport failure, or a slab of unexpected length, is returned as a
/// [`CommunicationError`]; the halo must then be treated as stale. A
/// communicator rank outside `topology` is
/// [`CommunicationError::InvalidPeer`].
pub fn exchange_halo<C: Communicator>(
    comm: &C,
    topology: &CartesianTopology,
    field: &mut PaddedField,
    axis: Axis,
) -> Result<(), CommunicationError> {
    topology
        .check_rank(comm.rank())
        .map_err(|_| CommunicationError::InvalidPeer {
            peer: comm.rank(),
            size: topology.size(),
        })?;
    let neighbors = topology.neighbors(comm.rank(), axis);

    let outgoing = [
        field.pack_boundary(axis, Side::Low),
        field.pack_boundary(axis, Side::High),
    ];

    for (side, slab) in Side::BOTH.into_iter().zip(&outgoing) {
        // A slab leaving through `side` lands in the halo on the opposite side
        let dest = neighbors[side];
        let src = neighbors[side.opposite()];
        let received = comm.sendrecv(
            dest.map(|d| (d, slab.as_slice())),
            src,
            halo_tag(axis, side),
        )?;

        if let (Some(values), Some(src)) = (received, src) {
            store_halo(field, axis, side.opposite(), &values, src)?;
        }
    }

    trace!(
        rank = comm.rank().get(),
        %axis,
        low = ?neighbors.low.map(Rank::get),
        high = ?neighbors.high.map(Rank::get),
        "halo exchange complete"
    );
    Ok(())
}

/// Refresh the halos along every axis.
pub fn exchange_all<C: Communicator>(
    comm: &C,
    topology: &CartesianTopology,
    field: &mut PaddedField,
) -> Result<(), CommunicationError> {
    for axis in Axis::ALL {
        exchange_halo(comm, topology, field, axis)?;
    }
    Ok(())
}

fn store_halo(
    field: &mut PaddedField,
    axis: Axis,
    side: Side,
    values: &[f64],
    from: Rank,
) -> Result<(), CommunicationError> {
    field
        .unpack_halo(axis, side, values)
        .map_err(|expected| CommunicationError::LengthMismatch {
            from,
            expected,
            actual: values.len(),
        })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::comm::{LocalCluster, SingleProcess};
    use crate::decomposition::Decomposition;
    use crate::types::{Extent3, GlobalGrid};

    fn global_value([gz, gy, gx]: [usize; 3]) -> f64 {
        (10_000 * gz + 100 * gy + gx) as f64
    }

    #[test]
    fn test_tags_are_distinct() {
        let mut tags: Vec<Tag> = Axis::ALL
            .iter()
            .flat_map(|&a| Side::BOTH.map(|s| halo_tag(a, s)))
            .collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn test_single_rank_periodic_wraps_onto_itself() {
        let topology = CartesianTopology::new([1, 1, 1], [true; 3], 1).unwrap();
        let decomp = Decomposition::new(GlobalGrid::new(2, 3, 4), topology, 1).unwrap();
        let sub = decomp.subdomain(Rank::ZERO).unwrap();
        let mut field = PaddedField::from_global_fn(&sub, global_value);

        let comm = SingleProcess::new();
        exchange_halo(&comm, decomp.topology(), &mut field, Axis::X).unwrap();

        // Low halo holds the last interior column, high halo the first
        assert_eq!(field.pack_halo(Axis::X, Side::Low), field.pack_boundary(Axis::X, Side::High));
        assert_eq!(field.pack_halo(Axis::X, Side::High), field.pack_boundary(Axis::X, Side::Low));
    }

    #[test]
    fn test_halos_mirror_neighbors_bit_for_bit() {
        let grid = GlobalGrid::new(4, 6, 8);
        let topology = CartesianTopology::new([2, 3, 2], [true; 3], 12).unwrap();
        let decomp = Decomposition::new(grid, topology, 1).unwrap();

        let checks = LocalCluster::run(12, |comm| {
            let sub = decomp.subdomain(comm.rank()).unwrap();
            let mut field = PaddedField::from_global_fn(&sub, global_value);
            exchange_all(&comm, decomp.topology(), &mut field).unwrap();

            // Compare every halo cell against the global field, wrapping periodically
            let mut mismatches = 0;
            let ext: Extent3 = sub.extent;
            let global = grid.extent().to_array();
            for axis in Axis::ALL {
                let a = axis.index();
                let [p, q] = axis.others();
                for side in Side::BOTH {
                    let values = field.pack_halo(axis, side);
                    let mut it = values.iter();
                    let along: isize = match side {
                        Side::Low => -1,
                        Side::High => ext.get(axis) as isize,
                    };
                    for cp in 0..ext.get(p) {
                        for cq in 0..ext.get(q) {
                            let mut g = [0isize; 3];
                            g[a] = sub.offset[a] as isize + along;
                            g[p.index()] = (sub.offset[p.index()] + cp) as isize;
                            g[q.index()] = (sub.offset[q.index()] + cq) as isize;
                            let wrapped =
                                [0, 1, 2].map(|d| g[d].rem_euclid(global[d] as isize) as usize);
                            let expected = global_value(wrapped);
                            if it.next().copied() != Some(expected) {
                                mismatches += 1;
                            }
                        }
                    }
                }
            }
            mismatches
        });

        assert!(checks.iter().all(|&m| m == 0), "halo mismatches per rank: {checks:?}");
    }

    #[test]
    fn test_non_periodic_edges_untouched() {
        let topology = CartesianTopology::new([1, 1, 2], [false; 3], 2).unwrap();
        let decomp = Decomposition::new(GlobalGrid::new(1, 1, 4), topology, 1).unwrap();

        let halos = LocalCluster::run(2, |comm| {
            let sub = decomp.subdomain(comm.rank()).unwrap();
            let mut field = PaddedField::from_global_fn(&sub, |[_, _, gx]| gx as f64 + 1.0);
            exchange_halo(&comm, decomp.topology(), &mut field, Axis::X).unwrap();
            (
                field.pack_halo(Axis::X, Side::Low),
                field.pack_halo(Axis::X, Side::High),
            )
        });

        assert_eq!(halos[0], (vec![0.0], vec![3.0]));
        assert_eq!(halos[1], (vec![2.0], vec![0.0]));
    }

    #[test]
    fn test_short_slab_rejected() {
        let topology = CartesianTopology::new([1, 1, 2], [false; 3], 2).unwrap();
        let decomp = Decomposition::new(GlobalGrid::new(1, 1, 4), topology, 1).unwrap();
        let comms = LocalCluster::with_timeout(2, Duration::from_secs(5));

        // Rank 0 sends two values where its high boundary slab holds one
        comms[0]
            .sendrecv(Some((Rank::new(1), &[7.0, 8.0])), None, halo_tag(Axis::X, Side::High))
            .unwrap();

        let sub = decomp.subdomain(Rank::new(1)).unwrap();
        let mut field = PaddedField::from_global_fn(&sub, |[_, _, gx]| gx as f64);
        let before = field.pack_halo(Axis::X, Side::Low);

        let err = exchange_halo(&comms[1], decomp.topology(), &mut field, Axis::X).unwrap_err();
        assert_eq!(
            err,
            CommunicationError::LengthMismatch {
                from: Rank::ZERO,
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(field.pack_halo(Axis::X, Side::Low), before);
    }

    #[test]
    fn test_rank_outside_topology() {
        let topology = CartesianTopology::new([1, 1, 1], [true; 3], 1).unwrap();
        let decomp = Decomposition::new(GlobalGrid::cube(4), topology, 1).unwrap();
        let comms = LocalCluster::new(2);
        let mut field = PaddedField::for_subdomain(&decomp.subdomain(Rank::ZERO).unwrap());

        let err = exchange_halo(&comms[1], decomp.topology(), &mut field, Axis::Y).unwrap_err();
        assert_eq!(
            err,
            CommunicationError::InvalidPeer {
                peer: Rank::new(1),
                size: 1
            }
        );
    }
}
