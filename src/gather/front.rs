// Thu Jan 15 2026 - Alex

use crate::comm::{Communicator, Rank};
use crate::gather::fixed::gather_fixed;
use crate::gather::nested::{gather_pairs, Element};
use crate::gather::text::gather_text;
use crate::gather::GatherError;
use crate::utils::logging::ScopedTimer;
use crate::wire::FixedSize;
use std::collections::HashMap;
use std::hash::Hash;

/// A value that every participant can contribute to a gather.
///
/// The strategy follows from the type alone: fixed-size records, sequences
/// (flat, nested or of pairs), text and maps each have their own path.
pub trait Gather: Sized {
    fn gather_with<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Self>>, GatherError>;
}

impl<T: FixedSize> Gather for T {
    fn gather_with<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Self>>, GatherError> {
        gather_fixed(self, comm, root)
    }
}

impl<T: Element> Gather for Vec<T> {
    fn gather_with<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Self>>, GatherError> {
        T::gather_column(self, comm, root)
    }
}

impl Gather for String {
    fn gather_with<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Self>>, GatherError> {
        gather_text(self, comm, root)
    }
}

// Entries travel as pairs in the map's iteration order.
impl<K, V> Gather for HashMap<K, V>
where
    K: Element + Eq + Hash,
    V: Element,
{
    fn gather_with<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Self>>, GatherError> {
        let entries: Vec<(K, V)> = self.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let gathered = gather_pairs(&entries, comm, root)?;
        Ok(gathered.map(|per_rank| {
            per_rank
                .into_iter()
                .map(|entries| entries.into_iter().collect())
                .collect()
        }))
    }
}

/// Collects `value` from every participant at `root`.
///
/// The root gets `Some` with one entry per rank, in rank order; every other
/// participant gets `None`. All participants must make the same call.
pub fn gather<T, C>(value: &T, comm: &C, root: Rank) -> Result<Option<Vec<T>>, GatherError>
where
    T: Gather,
    C: Communicator + ?Sized,
{
    let _timer = ScopedTimer::new("gather");
    value.gather_with(comm, root)
}

/// Output-parameter form of [`gather`]. `out` is left empty on non-root
/// participants.
pub fn gather_into<T, C>(value: &T, out: &mut Vec<T>, comm: &C, root: Rank) -> Result<(), GatherError>
where
    T: Gather,
    C: Communicator + ?Sized,
{
    out.clear();
    if let Some(collected) = gather(value, comm, root)? {
        *out = collected;
    }
    Ok(())
}
