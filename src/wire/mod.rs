// Tue Jan 13 2026 - Alex

pub mod error;
pub mod fixed;
pub mod text;

pub use error::WireError;
pub use fixed::{decode_exact, decode_vec, encode_slice, encode_value, FixedSize};
pub use text::{decode_text, decode_texts, encode_text, encode_texts};
