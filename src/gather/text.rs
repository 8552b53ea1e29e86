// Thu Jan 15 2026 - Alex

use crate::comm::{Communicator, Rank};
use crate::gather::nested::gather_nested;
use crate::gather::varlen::gather_sequence;
use crate::gather::GatherError;
use crate::wire::{decode_text, decode_texts, encode_text, encode_texts};

pub fn gather_text<C: Communicator + ?Sized>(
    text: &str,
    comm: &C,
    root: Rank,
) -> Result<Option<Vec<String>>, GatherError> {
    if comm.is_root(root) {
        log::trace!("gather_text to root {}", root);
    }

    let bytes = encode_text(text);
    match gather_sequence(&bytes, comm, root)? {
        Some(per_rank) => {
            let texts = per_rank
                .into_iter()
                .map(decode_text)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(texts))
        }
        None => Ok(None),
    }
}

pub fn gather_texts<C: Communicator + ?Sized>(
    texts: &[String],
    comm: &C,
    root: Rank,
) -> Result<Option<Vec<Vec<String>>>, GatherError> {
    if comm.is_root(root) {
        log::trace!("gather_texts to root {}", root);
    }

    let chunks = encode_texts(texts);
    match gather_nested(&chunks, comm, root)? {
        Some(per_rank) => {
            let texts = per_rank
                .into_iter()
                .map(decode_texts)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(texts))
        }
        None => Ok(None),
    }
}
