//! Domain decomposition of the global grid.
//!
//! The global `nz × ny × nx` grid is split into a Cartesian arrangement of
//! equally sized subdomains, one per rank. Each subdomain owns its interior
//! points exclusively and carries a halo of fixed width on every face that
//! mirrors the neighboring subdomain's boundary.
//!
//! # Example
//!
//! ```
//! use cfd_rs::decomposition::{CartesianTopology, Decomposition};
//! use cfd_rs::types::{Extent3, GlobalGrid, Rank};
//!
//! let topology = CartesianTopology::new([2, 2, 2], [true; 3], 8).unwrap();
//! let decomp = Decomposition::new(GlobalGrid::cube(8), topology, 1).unwrap();
//!
//! let sub = decomp.subdomain(Rank::new(7)).unwrap();
//! assert_eq!(sub.extent, Extent3::new(4, 4, 4));
//! assert_eq!(sub.offset, [4, 4, 4]);
//! ```

mod partition;
mod topology;

pub use partition::{Decomposition, Subdomain};
pub use topology::CartesianTopology;
