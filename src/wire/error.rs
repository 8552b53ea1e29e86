// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Buffer of {len} bytes is not a whole number of {elem_size}-byte elements")]
    Misaligned { len: usize, elem_size: usize },
    #[error("Expected {expected} elements, buffer holds {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("Invalid UTF-8 text: {0}")]
    InvalidText(String),
}
