// Thu Jan 15 2026 - Alex

pub mod comm;
pub mod config;
pub mod gather;
pub mod utils;
pub mod wire;

pub use comm::{CommError, Communicator, LocalComm, LocalGroup, Rank, SoloComm};
pub use config::Config;
pub use gather::{
    gather, gather_fixed, gather_into, gather_nested, gather_pairs, gather_sequence,
    gather_text, gather_texts, Element, Gather, GatherError, Offsets,
};
pub use wire::{FixedSize, WireError};
