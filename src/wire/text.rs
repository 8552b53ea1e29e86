// Wed Jan 14 2026 - Alex

use crate::wire::WireError;

// No terminator is written; the length travels separately, so NUL and any
// other byte survive unchanged.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

pub fn decode_text(bytes: Vec<u8>) -> Result<String, WireError> {
    String::from_utf8(bytes).map_err(|e| WireError::InvalidText(e.to_string()))
}

pub fn encode_texts(texts: &[String]) -> Vec<Vec<u8>> {
    texts.iter().map(|t| encode_text(t)).collect()
}

pub fn decode_texts(chunks: Vec<Vec<u8>>) -> Result<Vec<String>, WireError> {
    chunks.into_iter().map(decode_text).collect()
}
