// Tue Jan 13 2026 - Alex

use crate::comm::Rank;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    #[error("Invalid root {root} for {size} participants")]
    InvalidRoot { root: Rank, size: usize },
    #[error("Rank {rank} sent {actual} bytes, expected {expected}")]
    SizeMismatch { rank: Rank, expected: usize, actual: usize },
    #[error("Rank {rank} sent {actual} bytes, receive count is {expected}")]
    CountMismatch { rank: Rank, expected: usize, actual: usize },
    #[error("Root needs {expected} counts and displacements, got {counts} and {displs}")]
    MissingCounts { expected: usize, counts: usize, displs: usize },
    #[error("Participant {0} disconnected")]
    Disconnected(Rank),
    #[error("Message from rank {source_rank} belongs to call {actual}, expected call {expected}")]
    OutOfSequence { source_rank: Rank, expected: u64, actual: u64 },
    #[error("Duplicate contribution from rank {0}")]
    Duplicate(Rank),
}
