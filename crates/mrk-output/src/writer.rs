//! The `ReportWriter` trait implemented by all backend writers.

use crate::{CensusRow, ConnectionLengthRow, LossRow, OutputResult, WallLoadRow};

/// Trait implemented by the CSV, SQLite and Parquet writers.
///
/// Each call appends rows; rows from several runs may share one writer and
/// are told apart by their `qid` column.
pub trait ReportWriter {
    fn write_census(&mut self, rows: &[CensusRow]) -> OutputResult<()>;

    fn write_losses(&mut self, row: &LossRow) -> OutputResult<()>;

    fn write_wall_loads(&mut self, rows: &[WallLoadRow]) -> OutputResult<()>;

    fn write_connection_lengths(&mut self, rows: &[ConnectionLengthRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
