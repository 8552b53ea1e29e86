// Wed Jan 14 2026 - Alex

use crate::comm::{Communicator, Rank};
use crate::gather::GatherError;
use crate::wire::{decode_exact, encode_value, FixedSize};

/// Collects one fixed-size value from every participant at `root`.
///
/// Returns `Some` with one value per rank at the root and `None` elsewhere.
/// With a single participant the runtime is not involved at all.
pub fn gather_fixed<T, C>(value: &T, comm: &C, root: Rank) -> Result<Option<Vec<T>>, GatherError>
where
    T: FixedSize,
    C: Communicator + ?Sized,
{
    comm.check_root(root)?;

    if comm.is_root(root) {
        log::trace!("gather_fixed<{}> to root {}", std::any::type_name::<T>(), root);
    }

    if comm.size() == 1 {
        return Ok(Some(vec![*value]));
    }

    let payload = encode_value(value);
    match comm.gather_bytes(&payload, root)? {
        Some(flat) => Ok(Some(decode_exact(&flat, comm.size())?)),
        None => Ok(None),
    }
}
