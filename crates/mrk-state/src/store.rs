//! Marker state storage: `StateTable` (one row per marker).
//!
//! The same layout serves both the initial and the final state of a run.
//! Every `Vec` has exactly `len()` elements and row `i` of every column
//! belongs to the same marker:
//!
//! ```ignore
//! let row = table.row_of(MarkerId(17)).unwrap();
//! let lost_energy = table.weight()[row] * table.energy()[row];
//! ```
//!
//! Tables are read-only snapshots; nothing in the workspace mutates them
//! after [`StateTableBuilder`][crate::StateTableBuilder] has validated them.

use std::collections::BTreeMap;

use mrk_core::{EndCond, MarkerId, MrkError, MrkResult, TileId};

use crate::IdIndex;
use crate::columns::ColumnMap;

// ── StateKind ─────────────────────────────────────────────────────────────────

/// Which snapshot of the markers a table holds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StateKind {
    /// Marker state at the start of the simulation.
    Ini,
    /// Marker state when its simulation ended.
    End,
}

impl StateKind {
    /// Name used in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            StateKind::Ini => "inistate",
            StateKind::End => "endstate",
        }
    }
}

// ── StateTable ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for one state snapshot of all markers.
///
/// Initial states carry all-zero end conditions, error records and wall
/// tiles.
#[derive(Clone, Debug)]
pub struct StateTable {
    pub(crate) kind:      StateKind,
    pub(crate) id:        Vec<MarkerId>,
    pub(crate) endcond:   Vec<EndCond>,
    pub(crate) errormsg:  Vec<u32>,
    pub(crate) errorline: Vec<u32>,
    pub(crate) errormod:  Vec<u32>,
    pub(crate) weight:    Vec<f64>,
    pub(crate) energy:    Vec<f64>,
    pub(crate) mileage:   Vec<f64>,
    pub(crate) walltile:  Vec<TileId>,
    pub(crate) columns:   ColumnMap,
    pub(crate) index:     IdIndex,
}

impl StateTable {
    /// Number of markers.
    #[inline]
    pub fn len(&self) -> usize {
        self.id.len()
    }

    /// `true` if there are no markers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    // ── Column access ─────────────────────────────────────────────────────

    pub fn ids(&self) -> &[MarkerId] {
        &self.id
    }

    pub fn endcond(&self) -> &[EndCond] {
        &self.endcond
    }

    /// Error-message codes (0 = no error).
    pub fn errormsg(&self) -> &[u32] {
        &self.errormsg
    }

    /// Source line numbers of the errors.
    pub fn errorline(&self) -> &[u32] {
        &self.errorline
    }

    /// Error-module codes (0 = no error).
    pub fn errormod(&self) -> &[u32] {
        &self.errormod
    }

    /// Marker weights (physical particles per marker).
    pub fn weight(&self) -> &[f64] {
        &self.weight
    }

    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    /// Total path length (or time-like integration variable) travelled.
    pub fn mileage(&self) -> &[f64] {
        &self.mileage
    }

    pub fn walltile(&self) -> &[TileId] {
        &self.walltile
    }

    /// Recorded coordinate columns.
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Any `f64` column by name: `weight`, `energy`, `mileage` or a recorded
    /// coordinate.
    pub fn column(&self, name: &str) -> MrkResult<&[f64]> {
        match name {
            "weight"  => Ok(&self.weight),
            "energy"  => Ok(&self.energy),
            "mileage" => Ok(&self.mileage),
            other => self.columns.get(other).ok_or_else(|| MrkError::MissingField {
                table: self.kind.as_str(),
                field: other.to_owned(),
            }),
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Row holding marker `id`.
    #[inline]
    pub fn row_of(&self, id: MarkerId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Rows whose end condition passes `filter`, in table order.
    ///
    /// `None` selects every row, `Some(EndCond::NONE)` the aborted markers
    /// and any other code the markers having at least one of its flags.
    pub fn rows_with(&self, filter: Option<EndCond>) -> Vec<usize> {
        self.endcond
            .iter()
            .enumerate()
            .filter(|(_, code)| passes(**code, filter))
            .map(|(i, _)| i)
            .collect()
    }

    /// Per-row membership mask for `filter` (see [`rows_with`](Self::rows_with)).
    pub fn mask(&self, filter: Option<EndCond>) -> Vec<bool> {
        self.endcond.iter().map(|&code| passes(code, filter)).collect()
    }

    /// Values of column `name` for the markers passing `filter`.
    pub fn select(&self, name: &str, filter: Option<EndCond>) -> MrkResult<Vec<f64>> {
        let values = self.column(name)?;
        Ok(self.rows_with(filter).into_iter().map(|r| values[r]).collect())
    }

    /// IDs of the markers passing `filter`.
    pub fn ids_with(&self, filter: Option<EndCond>) -> Vec<MarkerId> {
        self.rows_with(filter).into_iter().map(|r| self.id[r]).collect()
    }

    /// Distinct end-condition codes with their marker counts, ascending by
    /// code.
    pub fn endconds(&self) -> Vec<(EndCond, usize)> {
        let mut counts: BTreeMap<EndCond, usize> = BTreeMap::new();
        for &code in &self.endcond {
            *counts.entry(code).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Cartesian `[x, y, z]` positions of the markers passing `filter`.
    pub fn point_cloud(&self, filter: Option<EndCond>) -> MrkResult<Vec<[f64; 3]>> {
        let x = self.column("x")?;
        let y = self.column("y")?;
        let z = self.column("z")?;
        Ok(self
            .rows_with(filter)
            .into_iter()
            .map(|r| [x[r], y[r], z[r]])
            .collect())
    }
}

#[inline]
fn passes(code: EndCond, filter: Option<EndCond>) -> bool {
    match filter {
        None => true,
        Some(f) if f.is_none() => code.is_none(),
        Some(f) => code.intersects(f),
    }
}
