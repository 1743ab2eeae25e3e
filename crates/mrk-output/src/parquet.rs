//! Parquet output backend (feature `parquet`).
//!
//! Creates four Snappy-compressed files in the configured output directory:
//! - `census.parquet`
//! - `losses.parquet`
//! - `wall_loads.parquet`
//! - `connection_lengths.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, StringBuilder, UInt32Builder, UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::ReportWriter;
use crate::{CensusRow, ConnectionLengthRow, LossRow, OutputResult, WallLoadRow};

fn census_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("qid",   DataType::Utf8,   false),
        Field::new("code",  DataType::UInt32, false),
        Field::new("name",  DataType::Utf8,   false),
        Field::new("count", DataType::UInt64, false),
    ]))
}

fn loss_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("qid",                DataType::Utf8,    false),
        Field::new("markers_lost",       DataType::UInt64,  false),
        Field::new("markers_fraction",   DataType::Float64, false),
        Field::new("particles_lost",     DataType::Float64, false),
        Field::new("particles_fraction", DataType::Float64, false),
        Field::new("energy_lost",        DataType::Float64, false),
        Field::new("energy_fraction",    DataType::Float64, false),
    ]))
}

fn wall_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("qid",                  DataType::Utf8,    false),
        Field::new("tile_id",              DataType::UInt32,  false),
        Field::new("area",                 DataType::Float64, false),
        Field::new("energy_deposited",     DataType::Float64, false),
        Field::new("power_density",        DataType::Float64, false),
        Field::new("particles_deposited",  DataType::Float64, false),
        Field::new("particle_density",     DataType::Float64, false),
        Field::new("markers_deposited",    DataType::UInt64,  false),
        Field::new("mean_incidence_angle", DataType::Float64, true),
    ]))
}

fn conlen_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("qid",               DataType::Utf8,    false),
        Field::new("plane",             DataType::UInt32,  false),
        Field::new("marker_id",         DataType::UInt64,  false),
        Field::new("mileage",           DataType::Float64, false),
        Field::new("connection_length", DataType::Float64, false),
        Field::new("lost",              DataType::Boolean, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// One output file and its schema.
struct Sink {
    writer: Option<ArrowWriter<File>>,
    schema: Arc<Schema>,
}

impl Sink {
    fn new(dir: &Path, name: &str, schema: Arc<Schema>) -> OutputResult<Self> {
        Ok(Self { writer: Some(open(dir, name, &schema)?), schema })
    }

    fn write(&mut self, columns: Vec<ArrayRef>) -> OutputResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        let batch = RecordBatch::try_new(Arc::clone(&self.schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn close(&mut self) -> OutputResult<()> {
        if let Some(w) = self.writer.take() {
            w.close()?;
        }
        Ok(())
    }
}

/// Writes reports to four Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    census: Sink,
    losses: Sink,
    wall:   Sink,
    conlen: Sink,
}

impl ParquetWriter {
    /// Create the four Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            census: Sink::new(dir, "census.parquet", census_schema())?,
            losses: Sink::new(dir, "losses.parquet", loss_schema())?,
            wall:   Sink::new(dir, "wall_loads.parquet", wall_schema())?,
            conlen: Sink::new(dir, "connection_lengths.parquet", conlen_schema())?,
        })
    }
}

impl ReportWriter for ParquetWriter {
    fn write_census(&mut self, rows: &[CensusRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut qids   = StringBuilder::new();
        let mut codes  = UInt32Builder::new();
        let mut names  = StringBuilder::new();
        let mut counts = UInt64Builder::new();
        for row in rows {
            qids.append_value(&row.qid);
            codes.append_value(row.code);
            names.append_value(&row.name);
            counts.append_value(row.count);
        }
        self.census.write(vec![
            Arc::new(qids.finish()),
            Arc::new(codes.finish()),
            Arc::new(names.finish()),
            Arc::new(counts.finish()),
        ])
    }

    fn write_losses(&mut self, row: &LossRow) -> OutputResult<()> {
        let mut qids = StringBuilder::new();
        let mut lost = UInt64Builder::new();
        let mut scalars: [Float64Builder; 5] = std::array::from_fn(|_| Float64Builder::new());

        qids.append_value(&row.qid);
        lost.append_value(row.markers_lost);
        let values = [
            row.markers_fraction,
            row.particles_lost,
            row.particles_fraction,
            row.energy_lost,
            row.energy_fraction,
        ];
        for (builder, value) in scalars.iter_mut().zip(values) {
            builder.append_value(value);
        }

        let mut columns: Vec<ArrayRef> = vec![Arc::new(qids.finish()), Arc::new(lost.finish())];
        columns.extend(scalars.iter_mut().map(|b| Arc::new(b.finish()) as ArrayRef));
        self.losses.write(columns)
    }

    fn write_wall_loads(&mut self, rows: &[WallLoadRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut qids       = StringBuilder::new();
        let mut tiles      = UInt32Builder::new();
        let mut areas      = Float64Builder::new();
        let mut edepo      = Float64Builder::new();
        let mut eload      = Float64Builder::new();
        let mut pdepo      = Float64Builder::new();
        let mut pload      = Float64Builder::new();
        let mut markers    = UInt64Builder::new();
        let mut incidences = Float64Builder::new();
        for row in rows {
            qids.append_value(&row.qid);
            tiles.append_value(row.tile_id);
            areas.append_value(row.area);
            edepo.append_value(row.energy_deposited);
            eload.append_value(row.power_density);
            pdepo.append_value(row.particles_deposited);
            pload.append_value(row.particle_density);
            markers.append_value(row.markers_deposited);
            incidences.append_option(row.mean_incidence_angle);
        }
        self.wall.write(vec![
            Arc::new(qids.finish()),
            Arc::new(tiles.finish()),
            Arc::new(areas.finish()),
            Arc::new(edepo.finish()),
            Arc::new(eload.finish()),
            Arc::new(pdepo.finish()),
            Arc::new(pload.finish()),
            Arc::new(markers.finish()),
            Arc::new(incidences.finish()),
        ])
    }

    fn write_connection_lengths(&mut self, rows: &[ConnectionLengthRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut qids     = StringBuilder::new();
        let mut planes   = UInt32Builder::new();
        let mut markers  = UInt64Builder::new();
        let mut mileages = Float64Builder::new();
        let mut lengths  = Float64Builder::new();
        let mut lost     = BooleanBuilder::new();
        for row in rows {
            qids.append_value(&row.qid);
            planes.append_value(row.plane);
            markers.append_value(row.marker_id);
            mileages.append_value(row.mileage);
            lengths.append_value(row.connection_length);
            lost.append_value(row.lost);
        }
        self.conlen.write(vec![
            Arc::new(qids.finish()),
            Arc::new(planes.finish()),
            Arc::new(markers.finish()),
            Arc::new(mileages.finish()),
            Arc::new(lengths.finish()),
            Arc::new(lost.finish()),
        ])
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.census.close()?;
        self.losses.close()?;
        self.wall.close()?;
        self.conlen.close()?;
        Ok(())
    }
}
