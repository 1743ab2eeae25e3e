//! Connection length: the distance a marker still travels after each
//! recorded plane crossing.
//!
//! The computation keeps confinement as an explicit per-sample flag.  The
//! signed form used by plotting code (positive for lost markers, negative
//! for confined ones) is produced only by [`ConnectionLength::signed`].

use mrk_core::{EndCond, MarkerId, MrkError, MrkResult};
use mrk_state::StateTable;

use crate::RunIndex;

/// Per-sample connection lengths of one plane, aligned with its samples.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionLength {
    pub ids:     Vec<MarkerId>,
    pub mileage: Vec<f64>,
    /// `total mileage - sample mileage`, unsigned.
    pub length:  Vec<f64>,
    /// Whether the sample's marker ended in a lost end condition.
    pub lost:    Vec<bool>,
}

impl ConnectionLength {
    pub fn len(&self) -> usize {
        self.length.len()
    }

    pub fn is_empty(&self) -> bool {
        self.length.is_empty()
    }

    /// Lengths with confined samples negated.
    pub fn signed(&self) -> Vec<f64> {
        self.length
            .iter()
            .zip(&self.lost)
            .map(|(&len, &lost)| if lost { len } else { -len })
            .collect()
    }
}

/// Connection length of every sample in `ids`/`mileage` (one plane's
/// samples, contiguous per marker).
///
/// Each marker's total mileage is read from `endstate`; the marker is lost if
/// its end condition intersects `lost`.  A marker absent from `endstate` is
/// `UnknownMarker`.
pub fn connection_length(
    endstate: &StateTable,
    ids:      &[MarkerId],
    mileage:  &[f64],
    lost:     EndCond,
) -> MrkResult<ConnectionLength> {
    if mileage.len() != ids.len() {
        return Err(MrkError::LengthMismatch {
            table:    "orbit",
            field:    "mileage".to_owned(),
            expected: ids.len(),
            got:      mileage.len(),
        });
    }

    let runs = RunIndex::decode(ids)?;

    // ── Per-marker lookups ────────────────────────────────────────────────
    let mut totals = Vec::with_capacity(runs.len());
    let mut status = Vec::with_capacity(runs.len());
    for id in runs.ids() {
        let row = endstate.row_of(id).ok_or(MrkError::UnknownMarker(id))?;
        totals.push(endstate.mileage()[row]);
        status.push(endstate.endcond()[row].intersects(lost));
    }

    // ── Broadcast and subtract ────────────────────────────────────────────
    let totals = runs.broadcast(&totals)?;
    let lost = runs.broadcast(&status)?;

    #[cfg(feature = "parallel")]
    let length: Vec<f64> = {
        use rayon::prelude::*;
        totals
            .par_iter()
            .zip(mileage.par_iter())
            .map(|(total, m)| total - m)
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let length: Vec<f64> = totals.iter().zip(mileage).map(|(total, m)| total - m).collect();

    Ok(ConnectionLength {
        ids: ids.to_vec(),
        mileage: mileage.to_vec(),
        length,
        lost,
    })
}
