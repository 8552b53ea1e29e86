// Tue Jan 13 2026 - Alex

pub mod error;
pub mod local;
pub mod solo;
pub mod stats;
pub mod traits;

pub use error::CommError;
pub use local::{LocalComm, LocalGroup};
pub use solo::SoloComm;
pub use stats::{CommStats, StatsSnapshot};
pub use traits::{Communicator, Rank};
