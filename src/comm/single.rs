//! Communicator for a job with a single rank.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::{CommunicationError, Communicator, Tag, check_peer};
use crate::types::Rank;

/// A communicator of size one.
///
/// Messages can only be addressed to rank 0 itself; they are queued and
/// handed back in send order. Periodic axes with a single rank exchange
/// halos with themselves through this queue.
#[derive(Default)]
pub struct SingleProcess {
    queue: Mutex<VecDeque<(Tag, Vec<f64>)>>,
}

impl SingleProcess {
    /// Create an empty single-rank communicator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Communicator for SingleProcess {
    fn rank(&self) -> Rank {
        Rank::ZERO
    }

    fn size(&self) -> usize {
        1
    }

    fn sendrecv(
        &self,
        send: Option<(Rank, &[f64])>,
        recv_from: Option<Rank>,
        tag: Tag,
    ) -> Result<Option<Vec<f64>>, CommunicationError> {
        let mut queue = self.queue.lock();
        if let Some((dest, payload)) = send {
            check_peer(dest, 1)?;
            queue.push_back((tag, payload.to_vec()));
        }
        let Some(src) = recv_from else {
            return Ok(None);
        };
        check_peer(src, 1)?;
        match queue.pop_front() {
            Some((actual, payload)) if actual == tag => Ok(Some(payload)),
            Some((actual, _)) => Err(CommunicationError::TagMismatch {
                from: src,
                expected: tag,
                actual,
            }),
            // Nobody else can ever send
            None => Err(CommunicationError::Disconnected { peer: src }),
        }
    }

    fn barrier(&self) -> Result<(), CommunicationError> {
        Ok(())
    }
}
