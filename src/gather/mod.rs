// Tue Jan 13 2026 - Alex

pub mod error;
pub mod fixed;
pub mod front;
pub mod nested;
pub mod offsets;
pub mod text;
pub mod varlen;

pub use error::GatherError;
pub use fixed::gather_fixed;
pub use front::{gather, gather_into, Gather};
pub use nested::{flatten, gather_nested, gather_pairs, rebuild, Element};
pub use offsets::Offsets;
pub use text::{gather_text, gather_texts};
pub use varlen::gather_sequence;
