//! Fluent builders for [`StateTable`] and [`OrbitTable`].
//!
//! # Usage
//!
//! ```rust
//! use mrk_core::{EndCond, MarkerId, TileId};
//! use mrk_state::{StateKind, StateTableBuilder};
//!
//! let table = StateTableBuilder::new(StateKind::End, vec![MarkerId(1), MarkerId(2)])
//!     .endcond(vec![EndCond::WALL, EndCond::TLIM])
//!     .errors(vec![0, 0], vec![0, 0], vec![0, 0])
//!     .weight(vec![1e18, 2e18])
//!     .energy(vec![3.5e6, 1.0e6])
//!     .mileage(vec![0.01, 0.2])
//!     .walltile(vec![TileId(12), TileId::NONE])
//!     .column("rho", vec![1.0, 0.4])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.row_of(MarkerId(2)), Some(1));
//! ```
//!
//! Every column is validated against the length of the ID list, and IDs
//! must be unique.  Final-state tables require the end-condition, error and
//! wall-tile columns; initial-state tables fill them with zeros.

use mrk_core::{EndCond, MarkerId, MrkError, MrkResult, TileId};

use crate::columns::ColumnMap;
use crate::{IdIndex, OrbitTable, StateKind, StateTable};

// ── StateTableBuilder ─────────────────────────────────────────────────────────

/// Fluent builder for [`StateTable`].
pub struct StateTableBuilder {
    kind:     StateKind,
    id:       Vec<MarkerId>,
    endcond:  Option<Vec<EndCond>>,
    errors:   Option<(Vec<u32>, Vec<u32>, Vec<u32>)>,
    weight:   Option<Vec<f64>>,
    energy:   Option<Vec<f64>>,
    mileage:  Option<Vec<f64>>,
    walltile: Option<Vec<TileId>>,
    columns:  Vec<(String, Vec<f64>)>,
}

impl StateTableBuilder {
    /// Start a table of `kind` with one row per entry of `ids`.
    pub fn new(kind: StateKind, ids: Vec<MarkerId>) -> Self {
        Self {
            kind,
            id:       ids,
            endcond:  None,
            errors:   None,
            weight:   None,
            energy:   None,
            mileage:  None,
            walltile: None,
            columns:  Vec::new(),
        }
    }

    pub fn endcond(mut self, endcond: Vec<EndCond>) -> Self {
        self.endcond = Some(endcond);
        self
    }

    /// Error records as three parallel columns: message code, source line,
    /// module code.
    pub fn errors(mut self, msg: Vec<u32>, line: Vec<u32>, module: Vec<u32>) -> Self {
        self.errors = Some((msg, line, module));
        self
    }

    pub fn weight(mut self, weight: Vec<f64>) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn energy(mut self, energy: Vec<f64>) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn mileage(mut self, mileage: Vec<f64>) -> Self {
        self.mileage = Some(mileage);
        self
    }

    pub fn walltile(mut self, walltile: Vec<TileId>) -> Self {
        self.walltile = Some(walltile);
        self
    }

    /// Attach a recorded coordinate column.
    pub fn column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    /// Validate lengths and ID uniqueness and build the ID index.
    pub fn build(self) -> MrkResult<StateTable> {
        let table = self.kind.as_str();
        let n = self.id.len();

        let weight  = required(table, "weight", self.weight, n)?;
        let energy  = required(table, "energy", self.energy, n)?;
        let mileage = required(table, "mileage", self.mileage, n)?;

        let (endcond, errors, walltile) = match self.kind {
            StateKind::End => (
                required(table, "endcond", self.endcond, n)?,
                self.errors.ok_or_else(|| missing(table, "errormsg"))?,
                required(table, "walltile", self.walltile, n)?,
            ),
            StateKind::Ini => (
                optional(table, "endcond", self.endcond, n, EndCond::NONE)?,
                self.errors.unwrap_or_else(|| (vec![0; n], vec![0; n], vec![0; n])),
                optional(table, "walltile", self.walltile, n, TileId::NONE)?,
            ),
        };
        let (errormsg, errorline, errormod) = errors;
        check_len(table, "errormsg", errormsg.len(), n)?;
        check_len(table, "errorline", errorline.len(), n)?;
        check_len(table, "errormod", errormod.len(), n)?;

        let mut columns = ColumnMap::new(n);
        for (name, values) in self.columns {
            columns.insert(table, name, values)?;
        }

        let mut index = IdIndex::default();
        index.reserve(n);
        for (row, &id) in self.id.iter().enumerate() {
            if index.insert(id, row).is_some() {
                return Err(MrkError::DuplicateMarker(id));
            }
        }

        Ok(StateTable {
            kind: self.kind,
            id: self.id,
            endcond,
            errormsg,
            errorline,
            errormod,
            weight,
            energy,
            mileage,
            walltile,
            columns,
            index,
        })
    }
}

// ── OrbitTableBuilder ─────────────────────────────────────────────────────────

/// Fluent builder for [`OrbitTable`].
///
/// The builder checks array lengths only; the per-marker contiguity of `id`
/// is verified when the runs are decoded.
pub struct OrbitTableBuilder {
    id:      Vec<MarkerId>,
    mileage: Option<Vec<f64>>,
    pncrid:  Option<Vec<u32>>,
    columns: Vec<(String, Vec<f64>)>,
}

impl OrbitTableBuilder {
    pub fn new(ids: Vec<MarkerId>) -> Self {
        Self { id: ids, mileage: None, pncrid: None, columns: Vec::new() }
    }

    pub fn mileage(mut self, mileage: Vec<f64>) -> Self {
        self.mileage = Some(mileage);
        self
    }

    /// Poincaré plane index of each sample.
    pub fn pncrid(mut self, pncrid: Vec<u32>) -> Self {
        self.pncrid = Some(pncrid);
        self
    }

    pub fn column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    pub fn build(self) -> MrkResult<OrbitTable> {
        let m = self.id.len();
        let mileage = required("orbit", "mileage", self.mileage, m)?;
        if let Some(p) = &self.pncrid {
            check_len("orbit", "pncrid", p.len(), m)?;
        }

        let mut columns = ColumnMap::new(m);
        for (name, values) in self.columns {
            columns.insert("orbit", name, values)?;
        }

        Ok(OrbitTable {
            id: self.id,
            mileage,
            pncrid: self.pncrid,
            columns,
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn missing(table: &'static str, field: &str) -> MrkError {
    MrkError::MissingField { table, field: field.to_owned() }
}

fn check_len(table: &'static str, field: &str, got: usize, expected: usize) -> MrkResult<()> {
    if got != expected {
        return Err(MrkError::LengthMismatch {
            table,
            field: field.to_owned(),
            expected,
            got,
        });
    }
    Ok(())
}

fn required<T>(
    table:    &'static str,
    field:    &str,
    values:   Option<Vec<T>>,
    expected: usize,
) -> MrkResult<Vec<T>> {
    let values = values.ok_or_else(|| missing(table, field))?;
    check_len(table, field, values.len(), expected)?;
    Ok(values)
}

fn optional<T: Clone>(
    table:    &'static str,
    field:    &str,
    values:   Option<Vec<T>>,
    expected: usize,
    fill:     T,
) -> MrkResult<Vec<T>> {
    match values {
        Some(v) => {
            check_len(table, field, v.len(), expected)?;
            Ok(v)
        }
        None => Ok(vec![fill; expected]),
    }
}
