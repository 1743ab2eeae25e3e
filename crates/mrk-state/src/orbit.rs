//! Recorded trajectory samples: `OrbitTable` (one row per sample).
//!
//! Samples of all markers are flattened into one set of arrays.  The
//! simulation writes each marker's samples as one contiguous block and the
//! blocks in ascending marker-ID order; this table stores that layout as-is
//! and leaves the run decoding (and its contiguity check) to the analytics.

use mrk_core::{MarkerId, MrkError, MrkResult};

use crate::columns::ColumnMap;

/// Structure-of-Arrays storage for orbit samples.
#[derive(Clone, Debug)]
pub struct OrbitTable {
    pub(crate) id:      Vec<MarkerId>,
    pub(crate) mileage: Vec<f64>,
    /// Poincaré plane index of each sample; `None` for plain time-series
    /// orbits.
    pub(crate) pncrid:  Option<Vec<u32>>,
    pub(crate) columns: ColumnMap,
}

impl OrbitTable {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.id.len()
    }

    /// `true` if no sample was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    pub fn ids(&self) -> &[MarkerId] {
        &self.id
    }

    /// Mileage of the marker at each sample.
    pub fn mileage(&self) -> &[f64] {
        &self.mileage
    }

    pub fn pncrid(&self) -> Option<&[u32]> {
        self.pncrid.as_deref()
    }

    /// `true` if samples carry Poincaré plane tags.
    pub fn has_poincare(&self) -> bool {
        self.pncrid.is_some()
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Any `f64` column by name: `mileage` or a recorded coordinate.
    pub fn column(&self, name: &str) -> MrkResult<&[f64]> {
        match name {
            "mileage" => Ok(&self.mileage),
            other => self.columns.get(other).ok_or_else(|| MrkError::MissingField {
                table: "orbit",
                field: other.to_owned(),
            }),
        }
    }

    /// The samples recorded at Poincaré plane `plane`, in table order.
    ///
    /// Filtering preserves relative order, so per-marker runs stay
    /// contiguous in the result whenever they were contiguous here.
    pub fn plane(&self, plane: u32) -> MrkResult<OrbitTable> {
        let pncrid = self
            .pncrid
            .as_ref()
            .ok_or_else(|| MrkError::MissingData("orbit(poincare)".to_owned()))?;

        let rows: Vec<usize> = pncrid
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == plane)
            .map(|(i, _)| i)
            .collect();

        Ok(OrbitTable {
            id:      rows.iter().map(|&r| self.id[r]).collect(),
            mileage: rows.iter().map(|&r| self.mileage[r]).collect(),
            pncrid:  Some(vec![plane; rows.len()]),
            columns: self.columns.gather(&rows),
        })
    }
}
