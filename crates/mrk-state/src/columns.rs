//! Named, per-row `f64` coordinate columns.
//!
//! # Design
//!
//! Tables carry a fixed set of typed columns (IDs, codes, weights, ...) plus
//! whatever coordinates the simulation happened to record (`r`, `z`, `rho`,
//! `phimod`, ...).  The latter live in a [`ColumnMap`]: one `Vec<f64>` per
//! field name, all the same length as the owning table.
//!
//! # Usage
//!
//! ```rust
//! use mrk_state::ColumnMap;
//!
//! let mut map = ColumnMap::new(3);
//! map.insert("endstate", "rho", vec![0.2, 0.9, 1.1]).unwrap();
//! assert_eq!(map.get("rho"), Some(&[0.2, 0.9, 1.1][..]));
//! ```

use std::collections::BTreeMap;

use mrk_core::{MrkError, MrkResult};

/// Registry of named coordinate arrays, all of length [`ColumnMap::rows`].
///
/// Iteration order is alphabetical so that exports are stable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnMap {
    rows: usize,
    map:  BTreeMap<String, Vec<f64>>,
}

impl ColumnMap {
    /// An empty map for a table of `rows` rows.
    pub fn new(rows: usize) -> Self {
        Self { rows, map: BTreeMap::new() }
    }

    /// Number of rows every column must have.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Add (or replace) column `name`.
    ///
    /// `table` only labels the error raised when `values` has the wrong
    /// length.
    pub fn insert(
        &mut self,
        table:  &'static str,
        name:   impl Into<String>,
        values: Vec<f64>,
    ) -> MrkResult<()> {
        let name = name.into();
        if values.len() != self.rows {
            return Err(MrkError::LengthMismatch {
                table,
                field:    name,
                expected: self.rows,
                got:      values.len(),
            });
        }
        self.map.insert(name, values);
        Ok(())
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Column `name`, or `None` if it was never recorded.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.map.get(name).map(Vec::as_slice)
    }

    /// `true` if column `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Column names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }

    /// Number of distinct columns.
    pub fn column_count(&self) -> usize {
        self.map.len()
    }

    // ── Row selection ─────────────────────────────────────────────────────

    /// A new map holding only `rows` (in the given order) of every column.
    pub(crate) fn gather(&self, rows: &[usize]) -> ColumnMap {
        let map = self
            .map
            .iter()
            .map(|(name, values)| (name.clone(), rows.iter().map(|&r| values[r]).collect()))
            .collect();
        ColumnMap { rows: rows.len(), map }
    }
}
