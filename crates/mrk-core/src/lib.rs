//! `mrk-core`: foundational types for marker-output analytics.
//!
//! This crate is a dependency of every other `mrk-*` crate.  It has no
//! `mrk-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `MarkerId`, `TileId`                                  |
//! | [`endcond`]     | `EndCond` bit-flag codes                              |
//! | [`codes`]       | `CodeTable` trait, `StandardCodes`                    |
//! | [`config`]      | `AnalysisConfig`, `OrbitWriteOptions`                 |
//! | [`units`]       | `ScaledValue` (magnitude-prefixed units)              |
//! | [`error`]       | `MrkError`, `ErrorKind`, `MrkResult`                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod codes;
pub mod config;
pub mod endcond;
pub mod error;
pub mod ids;
pub mod units;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use codes::{CodeTable, StandardCodes};
pub use config::{AnalysisConfig, OrbitWriteOptions};
pub use endcond::EndCond;
pub use error::{ErrorKind, MrkError, MrkResult};
pub use ids::{MarkerId, TileId};
pub use units::ScaledValue;
