//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `reports.db` file in the configured output directory with
//! four tables: `census`, `losses`, `wall_loads` and `connection_lengths`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::ReportWriter;
use crate::{CensusRow, ConnectionLengthRow, LossRow, OutputResult, WallLoadRow};

/// Writes reports to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `reports.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("reports.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS census (
                 qid   TEXT    NOT NULL,
                 code  INTEGER NOT NULL,
                 name  TEXT    NOT NULL,
                 count INTEGER NOT NULL,
                 PRIMARY KEY (qid, code)
             );
             CREATE TABLE IF NOT EXISTS losses (
                 qid                TEXT PRIMARY KEY,
                 markers_lost       INTEGER NOT NULL,
                 markers_fraction   REAL    NOT NULL,
                 particles_lost     REAL    NOT NULL,
                 particles_fraction REAL    NOT NULL,
                 energy_lost        REAL    NOT NULL,
                 energy_fraction    REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS wall_loads (
                 qid                  TEXT    NOT NULL,
                 tile_id              INTEGER NOT NULL,
                 area                 REAL    NOT NULL,
                 energy_deposited     REAL    NOT NULL,
                 power_density        REAL    NOT NULL,
                 particles_deposited  REAL    NOT NULL,
                 particle_density     REAL    NOT NULL,
                 markers_deposited    INTEGER NOT NULL,
                 mean_incidence_angle REAL,
                 PRIMARY KEY (qid, tile_id)
             );
             CREATE TABLE IF NOT EXISTS connection_lengths (
                 qid               TEXT    NOT NULL,
                 plane             INTEGER NOT NULL,
                 marker_id         INTEGER NOT NULL,
                 mileage           REAL    NOT NULL,
                 connection_length REAL    NOT NULL,
                 lost              INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl ReportWriter for SqliteWriter {
    fn write_census(&mut self, rows: &[CensusRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO census (qid, code, name, count) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.qid, row.code, row.name, row.count])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_losses(&mut self, row: &LossRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO losses \
             (qid, markers_lost, markers_fraction, particles_lost, particles_fraction, \
              energy_lost, energy_fraction) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.qid,
                row.markers_lost,
                row.markers_fraction,
                row.particles_lost,
                row.particles_fraction,
                row.energy_lost,
                row.energy_fraction,
            ],
        )?;
        Ok(())
    }

    fn write_wall_loads(&mut self, rows: &[WallLoadRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO wall_loads \
                 (qid, tile_id, area, energy_deposited, power_density, particles_deposited, \
                  particle_density, markers_deposited, mean_incidence_angle) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.qid,
                    row.tile_id,
                    row.area,
                    row.energy_deposited,
                    row.power_density,
                    row.particles_deposited,
                    row.particle_density,
                    row.markers_deposited,
                    row.mean_incidence_angle,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_connection_lengths(&mut self, rows: &[ConnectionLengthRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO connection_lengths \
                 (qid, plane, marker_id, mileage, connection_length, lost) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.qid,
                    row.plane,
                    row.marker_id,
                    row.mileage,
                    row.connection_length,
                    row.lost as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
