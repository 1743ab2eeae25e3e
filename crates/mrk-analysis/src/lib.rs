//! `mrk-analysis`: analytics over marker end states and orbit samples.
//!
//! Every component is a pure function of read-only tables: it either returns
//! a complete report or an [`MrkError`](mrk_core::MrkError).
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`census`]    | `endcondition_census`, `CensusReport`                       |
//! | [`loss`]      | `loss_summary`, `LossReport`                                |
//! | [`wall`]      | `wall_loads`, `WallGeometry`, `TileAreas`, figures of merit |
//! | [`runs`]      | `RunIndex` (orbit run decoding), `decode_runs`              |
//! | [`conlen`]    | `connection_length`, `ConnectionLength`                     |
//! | [`poincare`]  | `PlaneKind`, `poincare`                                     |
//! | [`analyzer`]  | `Analyzer` facade                                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Per-sample connection-length arithmetic on Rayon.         |
//! | `fx-hash`  | FxHashSet for the run-contiguity check.                   |
//! | `serde`    | Serialize/Deserialize on report types.                    |

pub mod analyzer;
pub mod census;
pub mod conlen;
pub mod loss;
pub mod poincare;
pub mod runs;
pub mod wall;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use census::{CensusEntry, CensusReport, ErrorLine, endcondition_census};
pub use conlen::{ConnectionLength, connection_length};
pub use loss::{LossReport, loss_summary};
pub use poincare::{PlaneKind, PoincareView, plane_kinds, poincare};
pub use runs::{Run, RunIndex, decode_runs};
pub use wall::{TileAreas, WallFigures, WallGeometry, WallLoadReport, figures_of_merit, wall_loads};

#[cfg(feature = "fx-hash")]
pub(crate) type IdSet = rustc_hash::FxHashSet<mrk_core::MarkerId>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type IdSet = std::collections::HashSet<mrk_core::MarkerId>;
