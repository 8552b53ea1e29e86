// Tue Jan 13 2026 - Alex

use crate::comm::CommError;
use crate::wire::WireError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatherError {
    #[error("Communication failed: {0}")]
    Comm(#[from] CommError),
    #[error("Wire format error: {0}")]
    Wire(#[from] WireError),
    #[error("Length overflow: {0}")]
    LengthOverflow(String),
}
