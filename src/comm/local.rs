//! In-process cluster: ranks as threads connected by channels.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use super::{BARRIER_TAG, CommunicationError, Communicator, Tag, check_peer};
use crate::types::Rank;

struct Envelope {
    tag: Tag,
    payload: Vec<f64>,
}

/// Factory for a set of connected [`ThreadComm`] endpoints.
///
/// Every ordered pair of ranks gets its own unbounded channel, so sends
/// never block and messages between two ranks arrive in send order.
///
/// # Example
///
/// ```
/// use cfd_rs::comm::{Communicator, LocalCluster};
/// use cfd_rs::types::Rank;
///
/// let sums = LocalCluster::run(3, |comm| {
///     let size = comm.size();
///     let me = comm.rank().get();
///     let next = Rank::new((me + 1) % size);
///     let prev = Rank::new((me + size - 1) % size);
///     let got = comm
///         .sendrecv(Some((next, &[me as f64])), Some(prev), 7)
///         .unwrap()
///         .unwrap();
///     got[0]
/// });
/// assert_eq!(sums, vec![2.0, 0.0, 1.0]);
/// ```
pub struct LocalCluster;

impl LocalCluster {
    /// Create `size` connected endpoints that wait forever on receives.
    pub fn new(size: usize) -> Vec<ThreadComm> {
        Self::build(size, None)
    }

    /// Create `size` connected endpoints whose receives give up after `timeout`.
    pub fn with_timeout(size: usize, timeout: Duration) -> Vec<ThreadComm> {
        Self::build(size, Some(timeout))
    }

    fn build(size: usize, timeout: Option<Duration>) -> Vec<ThreadComm> {
        // channels[src][dst]
        let mut senders: Vec<Vec<Sender<Envelope>>> = Vec::with_capacity(size);
        let mut receivers: Vec<Vec<Option<Receiver<Envelope>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();

        for src in 0..size {
            let mut row = Vec::with_capacity(size);
            for dst_receivers in receivers.iter_mut() {
                let (tx, rx) = unbounded();
                row.push(tx);
                dst_receivers[src] = Some(rx);
            }
            senders.push(row);
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| ThreadComm {
                rank: Rank::new(rank),
                outgoing,
                incoming: incoming.into_iter().flatten().collect(),
                timeout,
            })
            .collect()
    }

    /// Run `f` on `size` threads, one endpoint each, and collect the results in rank order.
    ///
    /// # Panics
    ///
    /// Propagates a panic from any rank.
    pub fn run<F, R>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(ThreadComm) -> R + Sync,
        R: Send,
    {
        let endpoints = Self::new(size);
        let f = &f;
        std::thread::scope(|scope| {
            let handles: Vec<_> = endpoints
                .into_iter()
                .map(|comm| scope.spawn(move || f(comm)))
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(r) => r,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        })
    }
}

/// One rank of a [`LocalCluster`].
pub struct ThreadComm {
    rank: Rank,
    outgoing: Vec<Sender<Envelope>>,
    incoming: Vec<Receiver<Envelope>>,
    timeout: Option<Duration>,
}

impl ThreadComm {
    fn send(&self, dest: Rank, payload: &[f64], tag: Tag) -> Result<(), CommunicationError> {
        check_peer(dest, self.size())?;
        self.outgoing[dest.get()]
            .send(Envelope {
                tag,
                payload: payload.to_vec(),
            })
            .map_err(|_| CommunicationError::Disconnected { peer: dest })
    }

    fn recv(&self, from: Rank, tag: Tag) -> Result<Vec<f64>, CommunicationError> {
        check_peer(from, self.size())?;
        let channel = &self.incoming[from.get()];
        let envelope = match self.timeout {
            Some(timeout) => channel.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => CommunicationError::Timeout { from, tag },
                RecvTimeoutError::Disconnected => CommunicationError::Disconnected { peer: from },
            })?,
            None => channel
                .recv()
                .map_err(|_| CommunicationError::Disconnected { peer: from })?,
        };
        if envelope.tag != tag {
            return Err(CommunicationError::TagMismatch {
                from,
                expected: tag,
                actual: envelope.tag,
            });
        }
        Ok(envelope.payload)
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.outgoing.len()
    }

    fn sendrecv(
        &self,
        send: Option<(Rank, &[f64])>,
        recv_from: Option<Rank>,
        tag: Tag,
    ) -> Result<Option<Vec<f64>>, CommunicationError> {
        if let Some((dest, payload)) = send {
            self.send(dest, payload, tag)?;
        }
        recv_from.map(|src| self.recv(src, tag)).transpose()
    }

    fn barrier(&self) -> Result<(), CommunicationError> {
        // Gather at rank 0, then release everyone
        let root = Rank::ZERO;
        if self.rank == root {
            for src in Rank::iter(self.size()).skip(1) {
                self.recv(src, BARRIER_TAG)?;
            }
            for dst in Rank::iter(self.size()).skip(1) {
                self.send(dst, &[], BARRIER_TAG)?;
            }
        } else {
            self.send(root, &[], BARRIER_TAG)?;
            self.recv(root, BARRIER_TAG)?;
        }
        Ok(())
    }
}
