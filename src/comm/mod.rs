//! Message passing between ranks.
//!
//! The derivative pipeline talks to its neighbors only through the
//! [`Communicator`] trait:
//! - **Halo exchange**: paired send/receive of boundary slabs
//! - **Interface coupling**: ring exchange of line end values
//!
//! Implementations:
//! - [`LocalCluster`] / [`ThreadComm`]: ranks as threads of one process,
//!   connected by crossbeam channels (tests, shared-memory runs)
//! - [`SingleProcess`]: a communicator of size one
//! - `MpiComm`: rsmpi world communicator (requires the `mpi` feature)

mod local;
#[cfg(feature = "mpi")]
mod mpi_comm;
mod single;

use thiserror::Error;

use crate::types::Rank;

pub use local::{LocalCluster, ThreadComm};
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;
pub use single::SingleProcess;

/// Message tag used to match sends with receives.
pub type Tag = u32;

/// Tag reserved for barrier traffic.
pub const BARRIER_TAG: Tag = u32::MAX;

/// Failure while moving data between ranks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommunicationError {
    /// No message arrived before the configured timeout.
    #[error("timed out waiting for tag {tag} from {from}")]
    Timeout { from: Rank, tag: Tag },

    /// The peer endpoint is gone.
    #[error("{peer} disconnected")]
    Disconnected { peer: Rank },

    /// A message arrived with an unexpected tag.
    #[error("expected tag {expected} from {from}, got {actual}")]
    TagMismatch {
        from: Rank,
        expected: Tag,
        actual: Tag,
    },

    /// A message arrived with an unexpected length.
    #[error("expected {expected} values from {from}, got {actual}")]
    LengthMismatch {
        from: Rank,
        expected: usize,
        actual: usize,
    },

    /// Peer rank outside the communicator.
    #[error("{peer} is not part of a communicator of size {size}")]
    InvalidPeer { peer: Rank, size: usize },

    /// Failure reported by the underlying transport.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Point-to-point messaging between the ranks of one job.
///
/// All operations are blocking. A rank that never enters a matching call
/// stalls its peers; implementations may bound the wait with a timeout.
pub trait Communicator {
    /// This rank.
    fn rank(&self) -> Rank;

    /// Number of ranks.
    fn size(&self) -> usize;

    /// Send `send.1` to `send.0` and receive one message from `recv_from`.
    ///
    /// Either half may be absent. The send never waits for the receive to
    /// be posted, so ring-shaped exchanges cannot deadlock. Returns the
    /// received payload when `recv_from` is given.
    fn sendrecv(
        &self,
        send: Option<(Rank, &[f64])>,
        recv_from: Option<Rank>,
        tag: Tag,
    ) -> Result<Option<Vec<f64>>, CommunicationError>;

    /// Block until every rank has entered the barrier.
    fn barrier(&self) -> Result<(), CommunicationError>;
}

impl<C: Communicator + ?Sized> Communicator for &C {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn sendrecv(
        &self,
        send: Option<(Rank, &[f64])>,
        recv_from: Option<Rank>,
        tag: Tag,
    ) -> Result<Option<Vec<f64>>, CommunicationError> {
        (**self).sendrecv(send, recv_from, tag)
    }

    fn barrier(&self) -> Result<(), CommunicationError> {
        (**self).barrier()
    }
}

/// Check that `peer` is a valid rank of a communicator of `size` ranks.
pub(crate) fn check_peer(peer: Rank, size: usize) -> Result<(), CommunicationError> {
    if peer.get() >= size {
        return Err(CommunicationError::InvalidPeer { peer, size });
    }
    Ok(())
}
