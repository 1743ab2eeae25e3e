//! CSV table loaders.
//!
//! # CSV format
//!
//! One header row naming the columns, then one row per marker (state tables)
//! or per sample (orbit tables).  Column order is free.
//!
//! ```csv
//! id,endcond,errormsg,errorline,errormod,weight,energy,mileage,walltile,rho
//! 1,8,0,0,0,1e18,3.5e6,0.012,1204,1.02
//! 2,1,0,0,0,1e18,3.1e6,0.500,0,0.41
//! ```
//!
//! | Table     | Required columns                                              |
//! |-----------|---------------------------------------------------------------|
//! | inistate  | `id`, `weight`, `energy`, `mileage`                           |
//! | endstate  | the above + `endcond`, `errormsg`, `errorline`, `errormod`, `walltile` |
//! | orbit     | `id`, `mileage` (`pncrid` optional)                           |
//!
//! Every other column is parsed as `f64` and stored as a named coordinate
//! column.  A missing required column is a `MissingField` error; a cell that
//! does not parse is a `Parse` error naming its row and column.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use tracing::debug;

use mrk_core::{EndCond, MarkerId, MrkError, MrkResult, TileId};

use crate::{OrbitTable, OrbitTableBuilder, StateKind, StateTable, StateTableBuilder};

const STATE_FIELDS: [&str; 4] = ["id", "weight", "energy", "mileage"];
const END_FIELDS: [&str; 5] = ["endcond", "errormsg", "errorline", "errormod", "walltile"];
const ORBIT_FIELDS: [&str; 3] = ["id", "mileage", "pncrid"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a state table of `kind` from a CSV file.
pub fn load_state_csv(path: &Path, kind: StateKind) -> MrkResult<StateTable> {
    let file = std::fs::File::open(path)?;
    load_state_reader(file, kind)
}

/// Like [`load_state_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or reading from an
/// in-memory buffer.
pub fn load_state_reader<R: Read>(reader: R, kind: StateKind) -> MrkResult<StateTable> {
    let table = kind.as_str();
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(parse_err)?.clone();

    let id       = column_index(&headers, table, "id")?;
    let weight   = column_index(&headers, table, "weight")?;
    let energy   = column_index(&headers, table, "energy")?;
    let mileage  = column_index(&headers, table, "mileage")?;
    let end_cols = match kind {
        StateKind::End => Some([
            column_index(&headers, table, "endcond")?,
            column_index(&headers, table, "errormsg")?,
            column_index(&headers, table, "errorline")?,
            column_index(&headers, table, "errormod")?,
            column_index(&headers, table, "walltile")?,
        ]),
        StateKind::Ini => None,
    };
    let mut extras = extra_columns(&headers, |name| {
        STATE_FIELDS.contains(&name) || (end_cols.is_some() && END_FIELDS.contains(&name))
    });

    // ── Parse CSV rows ────────────────────────────────────────────────────
    let mut ids: Vec<MarkerId> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    let mut energies: Vec<f64> = Vec::new();
    let mut mileages: Vec<f64> = Vec::new();
    let mut endconds: Vec<EndCond> = Vec::new();
    let (mut msgs, mut lines, mut mods): (Vec<u32>, Vec<u32>, Vec<u32>) =
        (Vec::new(), Vec::new(), Vec::new());
    let mut tiles: Vec<TileId> = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(parse_err)?;
        ids.push(MarkerId(cell(&record, &headers, id, row)?));
        weights.push(cell(&record, &headers, weight, row)?);
        energies.push(cell(&record, &headers, energy, row)?);
        mileages.push(cell(&record, &headers, mileage, row)?);
        if let Some([ec, msg, line, module, tile]) = end_cols {
            endconds.push(EndCond(cell(&record, &headers, ec, row)?));
            msgs.push(cell(&record, &headers, msg, row)?);
            lines.push(cell(&record, &headers, line, row)?);
            mods.push(cell(&record, &headers, module, row)?);
            tiles.push(TileId(cell(&record, &headers, tile, row)?));
        }
        for (idx, values) in extras.iter_mut() {
            values.push(cell(&record, &headers, *idx, row)?);
        }
    }

    debug!(table, rows = ids.len(), extra_columns = extras.len(), "loaded state csv");

    // ── Build the table ───────────────────────────────────────────────────
    let mut builder = StateTableBuilder::new(kind, ids)
        .weight(weights)
        .energy(energies)
        .mileage(mileages);
    if end_cols.is_some() {
        builder = builder
            .endcond(endconds)
            .errors(msgs, lines, mods)
            .walltile(tiles);
    }
    for (idx, values) in extras {
        builder = builder.column(headers[idx].trim(), values);
    }
    builder.build()
}

/// Load an orbit table from a CSV file.
pub fn load_orbit_csv(path: &Path) -> MrkResult<OrbitTable> {
    let file = std::fs::File::open(path)?;
    load_orbit_reader(file)
}

/// Like [`load_orbit_csv`] but accepts any `Read` source.
pub fn load_orbit_reader<R: Read>(reader: R) -> MrkResult<OrbitTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(parse_err)?.clone();

    let id      = column_index(&headers, "orbit", "id")?;
    let mileage = column_index(&headers, "orbit", "mileage")?;
    let pncrid  = headers.iter().position(|h| h.trim() == "pncrid");
    let mut extras = extra_columns(&headers, |name| ORBIT_FIELDS.contains(&name));

    let mut ids: Vec<MarkerId> = Vec::new();
    let mut mileages: Vec<f64> = Vec::new();
    let mut planes: Vec<u32> = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(parse_err)?;
        ids.push(MarkerId(cell(&record, &headers, id, row)?));
        mileages.push(cell(&record, &headers, mileage, row)?);
        if let Some(p) = pncrid {
            planes.push(cell(&record, &headers, p, row)?);
        }
        for (idx, values) in extras.iter_mut() {
            values.push(cell(&record, &headers, *idx, row)?);
        }
    }

    debug!(rows = ids.len(), poincare = pncrid.is_some(), "loaded orbit csv");

    let mut builder = OrbitTableBuilder::new(ids).mileage(mileages);
    if pncrid.is_some() {
        builder = builder.pncrid(planes);
    }
    for (idx, values) in extras {
        builder = builder.column(headers[idx].trim(), values);
    }
    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_err(e: csv::Error) -> MrkError {
    MrkError::Parse(e.to_string())
}

fn column_index(headers: &StringRecord, table: &'static str, name: &str) -> MrkResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| MrkError::MissingField { table, field: name.to_owned() })
}

/// `(column index, values)` accumulators for every header not claimed by
/// `is_known`.
fn extra_columns(headers: &StringRecord, is_known: impl Fn(&str) -> bool) -> Vec<(usize, Vec<f64>)> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !is_known(h.trim()))
        .map(|(i, _)| (i, Vec::new()))
        .collect()
}

fn cell<T>(record: &StringRecord, headers: &StringRecord, idx: usize, row: usize) -> MrkResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<T>().map_err(|e| {
        MrkError::Parse(format!(
            "row {row}, column `{}`: invalid value {raw:?}: {e}",
            &headers[idx]
        ))
    })
}
