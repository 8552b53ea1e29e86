// Thu Jan 15 2026 - Alex

use crate::comm::{Communicator, Rank};
use crate::gather::text::gather_texts;
use crate::gather::varlen::gather_sequence;
use crate::gather::GatherError;
use crate::wire::FixedSize;
use itertools::Itertools;

/// An element type that can sit inside a gathered sequence.
///
/// Fixed-size records go straight through the variable-length gather.
/// Strings, inner sequences and pairs are split into flat channels first and
/// rebuilt at the root, one level per layer of the static type.
pub trait Element: Clone + Send + Sized {
    fn gather_column<C: Communicator + ?Sized>(
        items: &[Self],
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Vec<Self>>>, GatherError>;
}

impl<T: FixedSize> Element for T {
    fn gather_column<C: Communicator + ?Sized>(
        items: &[Self],
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Vec<Self>>>, GatherError> {
        gather_sequence(items, comm, root)
    }
}

impl Element for String {
    fn gather_column<C: Communicator + ?Sized>(
        items: &[Self],
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Vec<Self>>>, GatherError> {
        gather_texts(items, comm, root)
    }
}

impl<T: Element> Element for Vec<T> {
    fn gather_column<C: Communicator + ?Sized>(
        items: &[Self],
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Vec<Self>>>, GatherError> {
        gather_nested(items, comm, root)
    }
}

impl<A: Element, B: Element> Element for (A, B) {
    fn gather_column<C: Communicator + ?Sized>(
        items: &[Self],
        comm: &C,
        root: Rank,
    ) -> Result<Option<Vec<Vec<Self>>>, GatherError> {
        gather_pairs(items, comm, root)
    }
}

pub fn flatten<T: Clone>(nested: &[Vec<T>]) -> (Vec<T>, Vec<u64>) {
    let total = nested.iter().map(Vec::len).sum();
    let mut data = Vec::with_capacity(total);
    let mut index = Vec::with_capacity(nested.len());

    for inner in nested {
        data.extend_from_slice(inner);
        index.push(inner.len() as u64);
    }
    (data, index)
}

/// Inverse of [`flatten`]. Panics if the index does not account for every
/// element exactly.
pub fn rebuild<T>(data: Vec<T>, index: &[u64]) -> Vec<Vec<T>> {
    let described: u64 = index.iter().sum();
    assert_eq!(
        described,
        data.len() as u64,
        "index channel describes {} elements, data channel holds {}",
        described,
        data.len()
    );

    let mut cursor = data.into_iter();
    index
        .iter()
        .map(|&len| {
            let len = len as usize;
            let mut inner = Vec::with_capacity(len);
            inner.extend(cursor.by_ref().take(len));
            inner
        })
        .collect()
}

/// Gathers a sequence of sequences: one data channel plus one index channel
/// of inner lengths, each through the element's own strategy.
pub fn gather_nested<T, C>(
    items: &[Vec<T>],
    comm: &C,
    root: Rank,
) -> Result<Option<Vec<Vec<Vec<T>>>>, GatherError>
where
    T: Element,
    C: Communicator + ?Sized,
{
    if comm.is_root(root) {
        log::trace!("gather_nested<{}> to root {}", std::any::type_name::<T>(), root);
    }

    let (data, index) = flatten(items);
    let data = T::gather_column(&data, comm, root)?;
    let index = gather_sequence(&index, comm, root)?;

    match (data, index) {
        (Some(data), Some(index)) => {
            assert_eq!(data.len(), index.len(), "channel participant counts differ");
            Ok(Some(
                data.into_iter()
                    .zip(index)
                    .map(|(data, index)| rebuild(data, &index))
                    .collect(),
            ))
        }
        _ => Ok(None),
    }
}

/// Gathers a sequence of pairs as two independent columns and zips them back
/// together per rank.
pub fn gather_pairs<A, B, C>(
    items: &[(A, B)],
    comm: &C,
    root: Rank,
) -> Result<Option<Vec<Vec<(A, B)>>>, GatherError>
where
    A: Element,
    B: Element,
    C: Communicator + ?Sized,
{
    if comm.is_root(root) {
        log::trace!(
            "gather_pairs<{}, {}> to root {}",
            std::any::type_name::<A>(),
            std::any::type_name::<B>(),
            root
        );
    }

    let (firsts, seconds): (Vec<A>, Vec<B>) = items.iter().cloned().unzip();
    let firsts = A::gather_column(&firsts, comm, root)?;
    let seconds = B::gather_column(&seconds, comm, root)?;

    match (firsts, seconds) {
        (Some(firsts), Some(seconds)) => Ok(Some(
            firsts
                .into_iter()
                .zip_eq(seconds)
                .map(|(a, b)| a.into_iter().zip_eq(b).collect())
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{LocalGroup, SoloComm};

    #[test]
    fn test_flatten_and_rebuild() {
        let nested = vec![vec![1, 2], vec![], vec![3]];
        let (data, index) = flatten(&nested);

        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(index, vec![2, 0, 1]);
        assert_eq!(rebuild(data, &index), nested);
    }

    #[test]
    #[should_panic(expected = "index channel describes")]
    fn test_rebuild_rejects_short_data() {
        rebuild(vec![1u8], &[2]);
    }

    #[test]
    fn test_two_level_nesting() {
        let results = LocalGroup::run(2, |comm| {
            let local: Vec<Vec<i32>> = match comm.rank() {
                0 => vec![vec![1, 2], vec![3]],
                _ => vec![vec![4, 5, 6]],
            };
            gather_nested(&local, comm, 0).unwrap()
        });

        assert_eq!(
            results[0],
            Some(vec![vec![vec![1, 2], vec![3]], vec![vec![4, 5, 6]]])
        );
        assert_eq!(results[1], None);
    }

    #[test]
    fn test_three_level_nesting_with_empties() {
        let contribution = |rank: usize| -> Vec<Vec<Vec<u16>>> {
            (0..rank)
                .map(|i| (0..=i).map(|j| vec![(rank * 100 + i * 10 + j) as u16; j]).collect())
                .collect()
        };

        let results = LocalGroup::run(4, |comm| gather_nested(&contribution(comm.rank()), comm, 3).unwrap());

        let gathered = results[3].clone().unwrap();
        assert_eq!(gathered.len(), 4);
        assert!(gathered[0].is_empty());
        for (rank, value) in gathered.iter().enumerate() {
            assert_eq!(value, &contribution(rank));
        }
    }

    #[test]
    fn test_pairs_of_numbers_and_text() {
        let results = LocalGroup::run(2, |comm| {
            let local: Vec<(i32, String)> = match comm.rank() {
                0 => vec![(1, "a".to_string()), (2, "bb".to_string())],
                _ => vec![(3, "ccc".to_string())],
            };
            gather_pairs(&local, comm, 0).unwrap()
        });

        assert_eq!(
            results[0],
            Some(vec![
                vec![(1, "a".to_string()), (2, "bb".to_string())],
                vec![(3, "ccc".to_string())],
            ])
        );
    }

    #[test]
    fn test_pairs_of_sequences() {
        let results = LocalGroup::run(3, |comm| {
            let r = comm.rank() as u32;
            let local: Vec<(Vec<u32>, f64)> = (0..r).map(|i| (vec![r; i as usize], i as f64 / 2.0)).collect();
            gather_pairs(&local, comm, 1).unwrap()
        });

        let gathered = results[1].clone().unwrap();
        let expected: Vec<(Vec<u32>, f64)> = vec![(vec![], 0.0), (vec![2], 0.5)];
        assert!(gathered[0].is_empty());
        assert_eq!(gathered[2], expected);
    }

    #[test]
    fn test_nested_single_participant() {
        let comm = SoloComm::new();
        let local = vec![vec!["x".to_string()], vec![], vec!["y\0z".to_string(), String::new()]];
        let result = gather_nested(&local, &comm, 0).unwrap();

        assert_eq!(result, Some(vec![local]));
        assert_eq!(comm.stats().snapshot().collectives, 0);
    }
}
