//! `mrk-output`: report writers for marker-output analytics.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                                  |
//! |-----------|-------------|----------------------------------------------------------------|
//! | *(none)*  | CSV         | `census.csv`, `losses.csv`, `wall_loads.csv`, `connection_lengths.csv` |
//! | `sqlite`  | SQLite      | `reports.db`                                                   |
//! | `parquet` | Parquet     | the four CSV basenames with a `.parquet` extension             |
//!
//! All backends implement [`ReportWriter`] and are driven by
//! [`ReportExporter`], which pulls the reports from an
//! [`Analyzer`](mrk_analysis::Analyzer).
//!
//! # Usage
//!
//! ```rust,ignore
//! use mrk_output::{CsvWriter, ReportExporter};
//!
//! let writer = CsvWriter::new(Path::new("./reports"))?;
//! let mut exporter = ReportExporter::new(writer).planes([0, 1]);
//! for qid in store.qids() {
//!     let run = store.run(&qid)?;
//!     exporter.export(&Analyzer::new(run).with_wall(&areas))?;
//! }
//! exporter.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use export::ReportExporter;
pub use row::{CensusRow, ConnectionLengthRow, LossRow, WallLoadRow};
pub use writer::ReportWriter;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetWriter;
