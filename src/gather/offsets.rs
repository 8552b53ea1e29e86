// Wed Jan 14 2026 - Alex

use crate::gather::GatherError;

/// Per-participant element counts and their exclusive prefix sum.
///
/// `displs` holds one more entry than `lengths`: `displs[0] == 0`,
/// `displs[i + 1] == displs[i] + lengths[i]`, and the last entry is the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offsets {
    lengths: Vec<usize>,
    displs: Vec<usize>,
}

impl Offsets {
    pub fn from_lengths(lengths: Vec<usize>) -> Result<Self, GatherError> {
        let mut displs = Vec::with_capacity(lengths.len() + 1);
        displs.push(0usize);

        let mut running = 0usize;
        for (rank, &len) in lengths.iter().enumerate() {
            running = running.checked_add(len).ok_or_else(|| {
                GatherError::LengthOverflow(format!("offset past rank {} exceeds usize", rank))
            })?;
            displs.push(running);
        }

        Ok(Self { lengths, displs })
    }

    pub fn from_wire_lengths(lengths: &[u64]) -> Result<Self, GatherError> {
        let lengths = lengths
            .iter()
            .map(|&len| {
                usize::try_from(len).map_err(|_| {
                    GatherError::LengthOverflow(format!("length {} does not fit usize", len))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_lengths(lengths)
    }

    pub fn single(len: usize) -> Self {
        Self {
            lengths: vec![len],
            displs: vec![0, len],
        }
    }

    pub fn participants(&self) -> usize {
        self.lengths.len()
    }

    pub fn total(&self) -> usize {
        self.displs[self.lengths.len()]
    }

    pub fn displacements(&self) -> &[usize] {
        &self.displs
    }

    /// Counts and displacements in bytes for elements of `elem_size` bytes.
    pub fn scaled(&self, elem_size: usize) -> Result<(Vec<usize>, Vec<usize>), GatherError> {
        let scale = |v: &usize| {
            v.checked_mul(elem_size).ok_or_else(|| {
                GatherError::LengthOverflow(format!("{} elements of {} bytes", v, elem_size))
            })
        };
        let counts = self.lengths.iter().map(scale).collect::<Result<Vec<_>, _>>()?;
        let displs = self.displs.iter().map(scale).collect::<Result<Vec<_>, _>>()?;
        Ok((counts, displs))
    }

    /// Cuts a flat buffer back into one sequence per participant.
    pub fn split<T>(&self, flat: Vec<T>) -> Vec<Vec<T>> {
        assert_eq!(
            flat.len(),
            self.total(),
            "flat buffer does not match offset total"
        );

        let mut items = flat.into_iter();
        self.lengths
            .iter()
            .map(|&len| {
                let mut local = Vec::with_capacity(len);
                local.extend(items.by_ref().take(len));
                local
            })
            .collect()
    }
}
