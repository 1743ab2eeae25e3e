//! Analysis configuration.
//!
//! Typically deserialized by the application (feature `serde`) and handed to
//! the analyzer.  Defaults reproduce the conventions of the simulation's own
//! post-processing.

use crate::EndCond;

// ── AnalysisConfig ────────────────────────────────────────────────────────────

/// Tunables shared by the analytics components.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// End condition counted as "lost" by the loss summary and selected as
    /// wall hits by the wall-load aggregation.  Default: `wall`.
    pub loss_endcond: EndCond,

    /// End conditions whose connection length keeps a positive sign.
    /// Default: `wall | rhomax`.
    pub lost_endconds: EndCond,

    /// Unit of `weight * energy` sums, before magnitude prefixes.
    pub energy_unit: String,

    /// Unit of tile areas.
    pub area_unit: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            loss_endcond:  EndCond::WALL,
            lost_endconds: EndCond::WALL | EndCond::RHOMAX,
            energy_unit:   "J".to_owned(),
            area_unit:     "m^2".to_owned(),
        }
    }
}

// ── OrbitWriteOptions ─────────────────────────────────────────────────────────

/// Which Poincaré planes were recorded during the simulation.
///
/// Each list holds the plane positions of one family.  A list whose first
/// entry is negative (the simulation's "disabled" marker) or that is empty
/// records no planes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrbitWriteOptions {
    /// Poloidal angles [deg] of the recorded poloidal planes.
    pub poloidal_angles: Vec<f64>,
    /// Toroidal angles [deg] of the recorded toroidal planes.
    pub toroidal_angles: Vec<f64>,
    /// Normalized radii of the recorded radial surfaces.
    pub radial_distances: Vec<f64>,
}

impl OrbitWriteOptions {
    fn enabled(list: &[f64]) -> usize {
        match list.first() {
            Some(first) if *first >= 0.0 => list.len(),
            _ => 0,
        }
    }

    /// Number of recorded poloidal planes.
    pub fn n_poloidal(&self) -> usize {
        Self::enabled(&self.poloidal_angles)
    }

    /// Number of recorded toroidal planes.
    pub fn n_toroidal(&self) -> usize {
        Self::enabled(&self.toroidal_angles)
    }

    /// Number of recorded radial surfaces.
    pub fn n_radial(&self) -> usize {
        Self::enabled(&self.radial_distances)
    }
}
