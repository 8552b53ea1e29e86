// Wed Jan 15 2026 - Alex

use crate::comm::traits::place_chunks;
use crate::comm::{CommError, CommStats, Communicator, Rank};
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Barrier};
use std::thread;

struct Envelope {
    source: Rank,
    sequence: u64,
    payload: Bytes,
}

/// One participant of an in-process group. Each participant runs on its own
/// thread and every collective ends at a group-wide barrier.
pub struct LocalComm {
    rank: Rank,
    size: usize,
    inbox: Mutex<Receiver<Envelope>>,
    outboxes: Vec<Sender<Envelope>>,
    barrier: Arc<Barrier>,
    sequence: AtomicU64,
    stats: CommStats,
}

pub struct LocalGroup;

impl LocalGroup {
    pub fn create(size: usize) -> Vec<LocalComm> {
        assert!(size > 0, "a group needs at least one participant");

        let (outboxes, inboxes): (Vec<_>, Vec<_>) = (0..size).map(|_| mpsc::channel()).unzip();
        let barrier = Arc::new(Barrier::new(size));

        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalComm {
                rank,
                size,
                inbox: Mutex::new(inbox),
                outboxes: outboxes.clone(),
                barrier: barrier.clone(),
                sequence: AtomicU64::new(0),
                stats: CommStats::new(),
            })
            .collect()
    }

    /// Runs `f` once per participant, each on its own thread, and returns the
    /// results in rank order.
    pub fn run<F, R>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(&LocalComm) -> R + Sync,
        R: Send,
    {
        let comms = Self::create(size);

        thread::scope(|scope| {
            let handles: Vec<_> = comms
                .iter()
                .map(|comm| {
                    let f = &f;
                    scope.spawn(move || f(comm))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

impl LocalComm {
    // Moves every contribution to the root. The root keeps draining its inbox
    // after a bad message so the whole group still reaches the barrier.
    fn exchange(&self, local: &[u8], root: Rank) -> Result<Option<Vec<Bytes>>, CommError> {
        self.check_root(root)?;
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.stats.record_collective();

        if self.rank != root {
            let envelope = Envelope {
                source: self.rank,
                sequence,
                payload: Bytes::copy_from_slice(local),
            };
            self.outboxes[root]
                .send(envelope)
                .map_err(|_| CommError::Disconnected(root))?;
            self.stats.record_sent(local.len());
            self.barrier.wait();
            return Ok(None);
        }

        let mut slots: Vec<Option<Bytes>> = vec![None; self.size];
        slots[root] = Some(Bytes::copy_from_slice(local));
        let mut failure = None;

        {
            let inbox = self.inbox.lock();
            for _ in 1..self.size {
                let envelope = inbox.recv().map_err(|_| CommError::Disconnected(self.rank))?;
                self.stats.record_received(envelope.payload.len());

                if failure.is_some() {
                    continue;
                }
                if envelope.sequence != sequence {
                    failure = Some(CommError::OutOfSequence {
                        source_rank: envelope.source,
                        expected: sequence,
                        actual: envelope.sequence,
                    });
                } else if slots[envelope.source].is_some() {
                    failure = Some(CommError::Duplicate(envelope.source));
                } else {
                    slots[envelope.source] = Some(envelope.payload);
                }
            }
        }

        self.barrier.wait();

        if let Some(err) = failure {
            return Err(err);
        }
        Ok(Some(slots.into_iter().map(Option::unwrap_or_default).collect()))
    }

    pub fn calls_issued(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn gather_bytes(&self, local: &[u8], root: Rank) -> Result<Option<Vec<u8>>, CommError> {
        let chunks = match self.exchange(local, root)? {
            Some(chunks) => chunks,
            None => return Ok(None),
        };

        let mut flat = Vec::with_capacity(local.len() * self.size);
        for (rank, chunk) in chunks.iter().enumerate() {
            if chunk.len() != local.len() {
                return Err(CommError::SizeMismatch {
                    rank,
                    expected: local.len(),
                    actual: chunk.len(),
                });
            }
            flat.extend_from_slice(chunk);
        }
        Ok(Some(flat))
    }

    fn gatherv_bytes(
        &self,
        local: &[u8],
        counts: &[usize],
        displs: &[usize],
        root: Rank,
    ) -> Result<Option<Vec<u8>>, CommError> {
        let chunks = match self.exchange(local, root)? {
            Some(chunks) => chunks,
            None => return Ok(None),
        };

        let views: Vec<&[u8]> = chunks.iter().map(|c| c.as_ref()).collect();
        place_chunks(&views, counts, displs).map(Some)
    }

    fn stats(&self) -> &CommStats {
        &self.stats
    }
}
