// Wed Jan 15 2026 - Alex

use crate::comm::{CommError, CommStats};

pub type Rank = usize;

/// The collective capabilities a distributed runtime has to offer.
///
/// Both collectives block until every participant has entered the matching
/// call. Results are only produced at `root`; every other rank gets `None`.
pub trait Communicator: Send + Sync {
    fn rank(&self) -> Rank;

    fn size(&self) -> usize;

    /// Every rank contributes the same number of bytes. The root receives
    /// all contributions concatenated in ascending rank order.
    fn gather_bytes(&self, local: &[u8], root: Rank) -> Result<Option<Vec<u8>>, CommError>;

    /// Rank `r` contributes `counts[r]` bytes, placed at `displs[r]` in the
    /// root's buffer. `counts` and `displs` are only read at the root.
    fn gatherv_bytes(
        &self,
        local: &[u8],
        counts: &[usize],
        displs: &[usize],
        root: Rank,
    ) -> Result<Option<Vec<u8>>, CommError>;

    fn stats(&self) -> &CommStats;

    fn is_root(&self, root: Rank) -> bool {
        self.rank() == root
    }

    fn check_root(&self, root: Rank) -> Result<(), CommError> {
        if root >= self.size() {
            return Err(CommError::InvalidRoot {
                root,
                size: self.size(),
            });
        }
        Ok(())
    }
}

pub(crate) fn place_chunks(
    chunks: &[&[u8]],
    counts: &[usize],
    displs: &[usize],
) -> Result<Vec<u8>, CommError> {
    if counts.len() < chunks.len() || displs.len() < chunks.len() {
        return Err(CommError::MissingCounts {
            expected: chunks.len(),
            counts: counts.len(),
            displs: displs.len(),
        });
    }

    for (rank, chunk) in chunks.iter().enumerate() {
        if chunk.len() != counts[rank] {
            return Err(CommError::CountMismatch {
                rank,
                expected: counts[rank],
                actual: chunk.len(),
            });
        }
    }

    let total = (0..chunks.len())
        .map(|r| displs[r] + counts[r])
        .max()
        .unwrap_or(0);

    let mut flat = vec![0u8; total];
    for (rank, chunk) in chunks.iter().enumerate() {
        let start = displs[rank];
        flat[start..start + chunk.len()].copy_from_slice(chunk);
    }
    Ok(flat)
}
