//! MPI communicator (requires the `mpi` feature and an MPI installation).
//!
//! The caller initializes MPI and keeps the universe alive for as long as
//! the communicator is used:
//!
//! ```ignore
//! let universe = mpi::initialize().expect("MPI init failed");
//! let comm = MpiComm::new(universe.world());
//! ```

use mpi::Rank as MpiRank;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use super::{CommunicationError, Communicator, Tag, check_peer};
use crate::types::Rank;

/// Rank of an MPI communicator.
pub struct MpiComm {
    world: SimpleCommunicator,
}

impl MpiComm {
    /// Wrap an MPI communicator (usually `universe.world()`).
    pub fn new(world: SimpleCommunicator) -> Self {
        Self { world }
    }

    fn mpi_tag(tag: Tag) -> Result<i32, CommunicationError> {
        i32::try_from(tag).map_err(|_| {
            CommunicationError::Transport(format!("tag {tag} exceeds the MPI tag range"))
        })
    }
}

impl Communicator for MpiComm {
    fn rank(&self) -> Rank {
        Rank::new(self.world.rank() as usize)
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn sendrecv(
        &self,
        send: Option<(Rank, &[f64])>,
        recv_from: Option<Rank>,
        tag: Tag,
    ) -> Result<Option<Vec<f64>>, CommunicationError> {
        let size = self.size();
        if let Some((dest, _)) = send {
            check_peer(dest, size)?;
        }
        if let Some(src) = recv_from {
            check_peer(src, size)?;
        }
        let tag = Self::mpi_tag(tag)?;

        // Immediate send so that rings of exchanges cannot deadlock
        let received = mpi::request::scope(|scope| {
            let request = send.map(|(dest, payload)| {
                self.world
                    .process_at_rank(dest.get() as MpiRank)
                    .immediate_send_with_tag(scope, payload, tag)
            });
            let received = recv_from.map(|src| {
                let (data, _status) = self
                    .world
                    .process_at_rank(src.get() as MpiRank)
                    .receive_vec_with_tag::<f64>(tag);
                data
            });
            if let Some(request) = request {
                request.wait();
            }
            received
        });
        Ok(received)
    }

    fn barrier(&self) -> Result<(), CommunicationError> {
        self.world.barrier();
        Ok(())
    }
}
