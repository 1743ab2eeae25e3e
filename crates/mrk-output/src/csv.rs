//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `census.csv`
//! - `losses.csv`
//! - `wall_loads.csv`
//! - `connection_lengths.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::ReportWriter;
use crate::{CensusRow, ConnectionLengthRow, LossRow, OutputResult, WallLoadRow};

/// Writes reports to four CSV files.
pub struct CsvWriter {
    census:   Writer<File>,
    losses:   Writer<File>,
    wall:     Writer<File>,
    conlen:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the four CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut census = Writer::from_path(dir.join("census.csv"))?;
        census.write_record(["qid", "code", "name", "count"])?;

        let mut losses = Writer::from_path(dir.join("losses.csv"))?;
        losses.write_record([
            "qid",
            "markers_lost",
            "markers_fraction",
            "particles_lost",
            "particles_fraction",
            "energy_lost",
            "energy_fraction",
        ])?;

        let mut wall = Writer::from_path(dir.join("wall_loads.csv"))?;
        wall.write_record([
            "qid",
            "tile_id",
            "area",
            "energy_deposited",
            "power_density",
            "particles_deposited",
            "particle_density",
            "markers_deposited",
            "mean_incidence_angle",
        ])?;

        let mut conlen = Writer::from_path(dir.join("connection_lengths.csv"))?;
        conlen.write_record(["qid", "plane", "marker_id", "mileage", "connection_length", "lost"])?;

        Ok(Self { census, losses, wall, conlen, finished: false })
    }
}

impl ReportWriter for CsvWriter {
    fn write_census(&mut self, rows: &[CensusRow]) -> OutputResult<()> {
        for row in rows {
            self.census.write_record(&[
                row.qid.clone(),
                row.code.to_string(),
                row.name.clone(),
                row.count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_losses(&mut self, row: &LossRow) -> OutputResult<()> {
        self.losses.write_record(&[
            row.qid.clone(),
            row.markers_lost.to_string(),
            row.markers_fraction.to_string(),
            row.particles_lost.to_string(),
            row.particles_fraction.to_string(),
            row.energy_lost.to_string(),
            row.energy_fraction.to_string(),
        ])?;
        Ok(())
    }

    fn write_wall_loads(&mut self, rows: &[WallLoadRow]) -> OutputResult<()> {
        for row in rows {
            self.wall.write_record(&[
                row.qid.clone(),
                row.tile_id.to_string(),
                row.area.to_string(),
                row.energy_deposited.to_string(),
                row.power_density.to_string(),
                row.particles_deposited.to_string(),
                row.particle_density.to_string(),
                row.markers_deposited.to_string(),
                row.mean_incidence_angle.map(|a| a.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_connection_lengths(&mut self, rows: &[ConnectionLengthRow]) -> OutputResult<()> {
        for row in rows {
            self.conlen.write_record(&[
                row.qid.clone(),
                row.plane.to_string(),
                row.marker_id.to_string(),
                row.mileage.to_string(),
                row.connection_length.to_string(),
                (row.lost as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.census.flush()?;
        self.losses.flush()?;
        self.wall.flush()?;
        self.conlen.flush()?;
        Ok(())
    }
}
