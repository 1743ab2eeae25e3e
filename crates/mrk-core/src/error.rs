//! Framework error type.
//!
//! Every analytics call either returns its full report or one of these
//! errors; nothing is retried and no default is substituted for missing data.
//! [`MrkError::kind`] groups the variants into the three failure classes
//! callers usually branch on.

use thiserror::Error;

use crate::{MarkerId, TileId};

/// Coarse classification of an [`MrkError`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// A required table or field was not produced for the run.
    MissingData,
    /// Input arrays violate a shape/ordering/code precondition.
    DataIntegrity,
    /// A ratio or selection has nothing to work on.
    DegenerateInput,
    /// Reading or parsing an input source failed.
    Io,
}

/// The top-level error type for `mrk-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum MrkError {
    #[error("output does not contain {0}, which is required")]
    MissingData(String),

    #[error("{table} has no field `{field}`")]
    MissingField {
        table: &'static str,
        field: String,
    },

    #[error("{table} field `{field}` has length {got}, expected {expected}")]
    LengthMismatch {
        table:    &'static str,
        field:    String,
        expected: usize,
        got:      usize,
    },

    #[error("marker {0} appears more than once in the state table")]
    DuplicateMarker(MarkerId),

    #[error("samples of marker {id} are not contiguous (run resumes at row {position})")]
    NonContiguousRun { id: MarkerId, position: usize },

    #[error("marker {0} is referenced by orbit samples but has no final state")]
    UnknownMarker(MarkerId),

    #[error("unknown {table} code {code}")]
    UnknownCode { table: &'static str, code: u32 },

    #[error("wall tile {0} is not part of the wall geometry")]
    UnknownTile(TileId),

    #[error("cannot compute {0}: denominator is zero")]
    ZeroDenominator(&'static str),

    #[error("unknown plane {plane} ({available} planes recorded)")]
    UnknownPlane { plane: usize, available: usize },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MrkError {
    /// Which failure class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MrkError::MissingData(_) | MrkError::MissingField { .. } => ErrorKind::MissingData,

            MrkError::LengthMismatch { .. }
            | MrkError::DuplicateMarker(_)
            | MrkError::NonContiguousRun { .. }
            | MrkError::UnknownMarker(_)
            | MrkError::UnknownCode { .. }
            | MrkError::UnknownTile(_) => ErrorKind::DataIntegrity,

            MrkError::ZeroDenominator(_) | MrkError::UnknownPlane { .. } => {
                ErrorKind::DegenerateInput
            }

            MrkError::Parse(_) | MrkError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Shorthand result type for all `mrk-*` crates.
pub type MrkResult<T> = Result<T, MrkError>;
