//! Run decoding for flattened per-sample arrays.
//!
//! Orbit tables store every marker's samples back to back.  [`RunIndex`]
//! makes that grouping explicit: one [`Run`] per marker in first-appearance
//! order, plus the offsets delimiting each run in the sample array.
//!
//! Contiguity is checked while decoding.  An ID that reappears after its run
//! ended is a `NonContiguousRun` error; runs need not be sorted.

use mrk_core::{MarkerId, MrkError, MrkResult};

use crate::IdSet;

/// One marker's contiguous block of samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Run {
    pub id:    MarkerId,
    /// Index of the first sample.
    pub start: usize,
    pub len:   usize,
}

impl Run {
    /// One past the last sample.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Explicit run index over a flattened ID array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunIndex {
    runs:    Vec<Run>,
    samples: usize,
}

impl RunIndex {
    /// Decode the runs of `ids` in one pass.
    ///
    /// ```rust
    /// use mrk_analysis::RunIndex;
    /// use mrk_core::MarkerId;
    ///
    /// let ids: Vec<MarkerId> = [1, 1, 1, 2, 2, 5, 5, 5, 5].map(MarkerId).to_vec();
    /// let index = RunIndex::decode(&ids).unwrap();
    /// assert_eq!(index.lengths(), vec![(MarkerId(1), 3), (MarkerId(2), 2), (MarkerId(5), 4)]);
    /// assert_eq!(index.offsets(), vec![0, 3, 5, 9]);
    /// ```
    pub fn decode(ids: &[MarkerId]) -> MrkResult<RunIndex> {
        let Some(&first) = ids.first() else {
            return Ok(RunIndex::default());
        };

        // Run starts: position 0 plus every position where the ID changes.
        let starts: Vec<usize> = std::iter::once(0)
            .chain((1..ids.len()).filter(|&i| ids[i] != ids[i - 1]))
            .collect();

        let mut seen = IdSet::default();
        seen.reserve(starts.len());
        seen.insert(first);
        for &start in &starts[1..] {
            if !seen.insert(ids[start]) {
                return Err(MrkError::NonContiguousRun { id: ids[start], position: start });
            }
        }

        let runs = starts
            .iter()
            .zip(starts[1..].iter().chain(std::iter::once(&ids.len())))
            .map(|(&start, &end)| Run { id: ids[start], start, len: end - start })
            .collect();

        Ok(RunIndex { runs, samples: ids.len() })
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of runs (distinct markers).
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Length of the decoded sample array.
    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// `(marker, run length)` pairs in first-appearance order.
    pub fn lengths(&self) -> Vec<(MarkerId, usize)> {
        self.runs.iter().map(|r| (r.id, r.len)).collect()
    }

    /// Marker IDs in first-appearance order.
    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.runs.iter().map(|r| r.id)
    }

    /// `len() + 1` offsets; run `k` covers `offsets[k]..offsets[k + 1]`.
    pub fn offsets(&self) -> Vec<usize> {
        let mut offsets: Vec<usize> = self.runs.iter().map(|r| r.start).collect();
        offsets.push(self.samples);
        offsets
    }

    /// Repeat each per-run value across its run's samples.
    pub fn broadcast<T: Copy>(&self, per_run: &[T]) -> MrkResult<Vec<T>> {
        if per_run.len() != self.runs.len() {
            return Err(MrkError::LengthMismatch {
                table:    "run index",
                field:    "per-run values".to_owned(),
                expected: self.runs.len(),
                got:      per_run.len(),
            });
        }
        let mut out = Vec::with_capacity(self.samples);
        for (run, &value) in self.runs.iter().zip(per_run) {
            out.extend(std::iter::repeat_n(value, run.len));
        }
        Ok(out)
    }
}

/// `(marker, run length)` pairs of `ids`; shorthand for
/// [`RunIndex::decode`] followed by [`RunIndex::lengths`].
pub fn decode_runs(ids: &[MarkerId]) -> MrkResult<Vec<(MarkerId, usize)>> {
    RunIndex::decode(ids).map(|index| index.lengths())
}
