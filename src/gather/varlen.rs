// Wed Jan 14 2026 - Alex

use crate::comm::{Communicator, Rank};
use crate::gather::fixed::gather_fixed;
use crate::gather::{GatherError, Offsets};
use crate::wire::{decode_exact, encode_slice, FixedSize};

/// Collects a sequence of any length from every participant at `root`.
///
/// Lengths are gathered first, then the elements land in one flat buffer at
/// the offsets derived from them and are sliced back out per rank.
pub fn gather_sequence<T, C>(items: &[T], comm: &C, root: Rank) -> Result<Option<Vec<Vec<T>>>, GatherError>
where
    T: FixedSize,
    C: Communicator + ?Sized,
{
    comm.check_root(root)?;

    if comm.size() == 1 {
        let offsets = Offsets::single(items.len());
        return Ok(Some(offsets.split(items.to_vec())));
    }

    let local_len = items.len() as u64;
    let lengths = gather_fixed(&local_len, comm, root)?;
    let payload = encode_slice(items);

    let lengths = match lengths {
        Some(lengths) => lengths,
        None => {
            comm.gatherv_bytes(&payload, &[], &[], root)?;
            return Ok(None);
        }
    };

    let plan = Offsets::from_wire_lengths(&lengths).and_then(|offsets| {
        let (counts, displs) = offsets.scaled(T::SIZE)?;
        Ok((offsets, counts, displs))
    });
    let (offsets, counts, displs) = match plan {
        Ok(plan) => plan,
        Err(err) => {
            // The other ranks are already inside the payload collective;
            // enter it too so they are released, then report the overflow.
            let _ = comm.gatherv_bytes(&payload, &[], &[], root);
            return Err(err);
        }
    };

    log::debug!(
        "gather_sequence<{}>: {} elements from {} ranks, offsets {:?}",
        std::any::type_name::<T>(),
        offsets.total(),
        offsets.participants(),
        offsets.displacements()
    );

    let flat = comm
        .gatherv_bytes(&payload, &counts, &displs, root)?
        .unwrap_or_default();
    let flat: Vec<T> = decode_exact(&flat, offsets.total())?;

    Ok(Some(offsets.split(flat)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{CommError, CommStats, LocalComm, LocalGroup, SoloComm};

    // Reports lengths no buffer could hold, as a corrupted length gather would.
    struct OversizedLengths<'a>(&'a LocalComm);

    impl Communicator for OversizedLengths<'_> {
        fn rank(&self) -> Rank {
            self.0.rank()
        }

        fn size(&self) -> usize {
            self.0.size()
        }

        fn gather_bytes(&self, local: &[u8], root: Rank) -> Result<Option<Vec<u8>>, CommError> {
            let gathered = self.0.gather_bytes(local, root)?;
            Ok(gathered.map(|_| encode_slice(&vec![u64::MAX; self.size()]).to_vec()))
        }

        fn gatherv_bytes(
            &self,
            local: &[u8],
            counts: &[usize],
            displs: &[usize],
            root: Rank,
        ) -> Result<Option<Vec<u8>>, CommError> {
            self.0.gatherv_bytes(local, counts, displs, root)
        }

        fn stats(&self) -> &CommStats {
            self.0.stats()
        }
    }

    #[test]
    fn test_variable_lengths_come_back_per_rank() {
        let results = LocalGroup::run(4, |comm| {
            let items: Vec<i32> = (0..comm.rank() as i32 * 2).map(|i| i * 100 + comm.rank() as i32).collect();
            gather_sequence(&items, comm, 0).unwrap()
        });

        let gathered = results[0].clone().unwrap();
        assert_eq!(gathered.len(), 4);
        for (rank, seq) in gathered.iter().enumerate() {
            let expected: Vec<i32> = (0..rank as i32 * 2).map(|i| i * 100 + rank as i32).collect();
            assert_eq!(seq, &expected);
        }
        assert!(results[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_empty_contribution_in_the_middle() {
        let results = LocalGroup::run(3, |comm| {
            let items: Vec<u8> = if comm.rank() == 1 { vec![] } else { vec![comm.rank() as u8; 3] };
            gather_sequence(&items, comm, 1).unwrap()
        });

        assert_eq!(results[1], Some(vec![vec![0, 0, 0], vec![], vec![2, 2, 2]]));
    }

    #[test]
    fn test_everyone_empty() {
        let results = LocalGroup::run(2, |comm| gather_sequence::<f32, _>(&[], comm, 0).unwrap());
        assert_eq!(results[0], Some(vec![vec![], vec![]]));
    }

    #[test]
    fn test_repeated_calls_with_changing_sizes() {
        let results = LocalGroup::run(3, |comm| {
            let mut rounds = Vec::new();
            for step in 0..5usize {
                let n = (comm.rank() * 3 + step * 2) % 5;
                let items: Vec<u64> = (0..n as u64).map(|i| i + (step as u64) * 1000).collect();
                rounds.push(gather_sequence(&items, comm, step % 3).unwrap());
            }
            rounds
        });

        for step in 0..5usize {
            let root = step % 3;
            let gathered = results[root][step].clone().unwrap();
            for (rank, seq) in gathered.iter().enumerate() {
                let n = (rank * 3 + step * 2) % 5;
                let expected: Vec<u64> = (0..n as u64).map(|i| i + (step as u64) * 1000).collect();
                assert_eq!(seq, &expected);
            }
        }
    }

    #[test]
    fn test_single_participant_identity() {
        let comm = SoloComm::new();
        let result = gather_sequence(&[1u32, 2, 3], &comm, 0).unwrap();

        assert_eq!(result, Some(vec![vec![1, 2, 3]]));
        assert_eq!(comm.stats().snapshot().collectives, 0);
    }

    #[test]
    fn test_root_overflow_still_releases_other_ranks() {
        let results = LocalGroup::run(3, |comm| {
            let first = gather_sequence(&[1u32, 2], &OversizedLengths(comm), 0);
            // the group must still be in step for the next call
            let second = gather_sequence(&[comm.rank() as u32], comm, 0);
            (first, second)
        });

        assert!(matches!(results[0].0, Err(GatherError::LengthOverflow(_))));
        assert_eq!(results[1].0, Ok(None));
        assert_eq!(results[2].0, Ok(None));
        assert_eq!(results[0].1, Ok(Some(vec![vec![0], vec![1], vec![2]])));
    }

    #[test]
    fn test_zero_sized_elements_keep_their_counts() {
        let results = LocalGroup::run(2, |comm| {
            let items = vec![[0u8; 0]; comm.rank() * 2 + 3];
            gather_sequence(&items, comm, 0).unwrap()
        });

        let gathered = results[0].clone().unwrap();
        assert_eq!(gathered.len(), 2);
        assert_eq!(gathered[0].len(), 3);
        assert_eq!(gathered[1].len(), 5);
    }
}
