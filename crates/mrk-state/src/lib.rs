//! `mrk-state`: Structure-of-Arrays tables for simulation output.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`store`]     | `StateTable` (per-marker ini/end state), `StateKind`        |
//! | [`orbit`]     | `OrbitTable` (flattened per-sample trajectories)            |
//! | [`columns`]   | `ColumnMap` (named coordinate columns)                      |
//! | [`builder`]   | `StateTableBuilder`, `OrbitTableBuilder` (validated build)  |
//! | [`run`]       | `RunOutput`, `Capabilities`, `RunStore`, `MemoryStore`      |
//! | [`loader`]    | CSV loaders for state and orbit tables                      |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `serde`   | Propagates serde derives to `mrk-core` types.              |
//! | `fx-hash` | FxHash for the marker-ID → row index.                      |

pub mod builder;
pub mod columns;
pub mod loader;
pub mod orbit;
pub mod run;
pub mod store;


pub use builder::{OrbitTableBuilder, StateTableBuilder};
pub use columns::ColumnMap;
pub use loader::{load_orbit_csv, load_orbit_reader, load_state_csv, load_state_reader};
pub use orbit::OrbitTable;
pub use run::{Capabilities, Capability, MemoryStore, RunOutput, RunStore};
pub use store::{StateKind, StateTable};

#[cfg(feature = "fx-hash")]
pub(crate) type IdIndex = rustc_hash::FxHashMap<mrk_core::MarkerId, usize>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type IdIndex = std::collections::HashMap<mrk_core::MarkerId, usize>;
