//! `ReportExporter<W>`: runs the analytics of one run and hands the rows to
//! a [`ReportWriter`].

use tracing::{debug, info};

use mrk_analysis::Analyzer;
use mrk_core::CodeTable;

use crate::row::{CensusRow, ConnectionLengthRow, LossRow, WallLoadRow};
use crate::writer::ReportWriter;
use crate::OutputResult;

/// Exports the reports of one or more runs to any [`ReportWriter`] backend
/// (CSV, SQLite or Parquet).
///
/// Census and losses are always exported.  Wall loads are exported when the
/// analyzer has a wall geometry, connection lengths for every plane listed
/// with [`planes`][Self::planes].
///
/// Every report of a run is computed before the first row is written, so an
/// analysis error leaves the writer untouched for that run.
pub struct ReportExporter<W: ReportWriter> {
    writer:    W,
    planes:    Vec<usize>,
    incidence: Option<String>,
}

impl<W: ReportWriter> ReportExporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, planes: Vec::new(), incidence: None }
    }

    /// Planes whose connection lengths are exported.
    pub fn planes(mut self, planes: impl IntoIterator<Item = usize>) -> Self {
        self.planes = planes.into_iter().collect();
        self
    }

    /// Final-state column holding incidence angles for the wall loads.
    pub fn incidence(mut self, column: impl Into<String>) -> Self {
        self.incidence = Some(column.into());
        self
    }

    /// Compute and write all reports of the analyzer's run.
    pub fn export<C: CodeTable>(&mut self, analyzer: &Analyzer<'_, C>) -> OutputResult<()> {
        let qid = analyzer.run().qid.as_str();

        // ── Compute ───────────────────────────────────────────────────────
        let census = CensusRow::from_report(qid, &analyzer.census()?);
        let losses = LossRow::from_report(qid, &analyzer.losses()?);
        let wall = if analyzer.has_wall() {
            let report = analyzer.wall_loads(self.incidence.as_deref())?;
            Some(WallLoadRow::from_report(qid, &report))
        } else {
            None
        };
        let mut conlen = Vec::new();
        for &plane in &self.planes {
            let lengths = analyzer.connection_length(plane)?;
            conlen.extend(ConnectionLengthRow::from_conlen(qid, plane as u32, &lengths));
        }

        // ── Write ─────────────────────────────────────────────────────────
        self.writer.write_census(&census)?;
        self.writer.write_losses(&losses)?;
        if let Some(rows) = &wall {
            self.writer.write_wall_loads(rows)?;
        }
        if !conlen.is_empty() {
            self.writer.write_connection_lengths(&conlen)?;
        }

        info!(
            qid,
            census_rows = census.len(),
            wall_rows = wall.as_ref().map_or(0, Vec::len),
            conlen_rows = conlen.len(),
            "exported run"
        );
        Ok(())
    }

    /// Flush the writer; idempotent.
    pub fn finish(&mut self) -> OutputResult<()> {
        debug!("finishing report writer");
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the export).
    pub fn into_writer(self) -> W {
        self.writer
    }
}
