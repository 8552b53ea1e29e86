// Wed Jan 15 2026 - Alex

use crate::comm::traits::place_chunks;
use crate::comm::{CommError, CommStats, Communicator, Rank};

/// Runtime for a run with a single participant.
#[derive(Debug, Default)]
pub struct SoloComm {
    stats: CommStats,
}

impl SoloComm {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Communicator for SoloComm {
    fn rank(&self) -> Rank {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn gather_bytes(&self, local: &[u8], root: Rank) -> Result<Option<Vec<u8>>, CommError> {
        self.check_root(root)?;
        self.stats.record_collective();
        Ok(Some(local.to_vec()))
    }

    fn gatherv_bytes(
        &self,
        local: &[u8],
        counts: &[usize],
        displs: &[usize],
        root: Rank,
    ) -> Result<Option<Vec<u8>>, CommError> {
        self.check_root(root)?;
        self.stats.record_collective();
        place_chunks(&[local], counts, displs).map(Some)
    }

    fn stats(&self) -> &CommStats {
        &self.stats
    }
}
