//! Poincaré plots: orbit crossings of one recorded plane.

use std::fmt;

use mrk_core::{EndCond, MarkerId, MrkError, MrkResult, OrbitWriteOptions};
use mrk_state::{Capability, OrbitTable, RunOutput};

use crate::{ConnectionLength, connection_length};

/// Family of a recorded plane.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaneKind {
    /// Constant poloidal angle.
    Poloidal,
    /// Constant toroidal angle.
    Toroidal,
    /// Constant normalized radius.
    Radial,
}

impl PlaneKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaneKind::Poloidal => "pol",
            PlaneKind::Toroidal => "tor",
            PlaneKind::Radial   => "rad",
        }
    }

    /// Orbit columns plotted on the horizontal and vertical axes.
    pub fn coordinates(self) -> (&'static str, &'static str) {
        match self {
            PlaneKind::Poloidal => ("r", "z"),
            PlaneKind::Toroidal => ("rho", "phimod"),
            PlaneKind::Radial   => ("thetamod", "phimod"),
        }
    }
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of every recorded plane, indexed by plane number: poloidal planes
/// first, then toroidal, then radial.
pub fn plane_kinds(options: &OrbitWriteOptions) -> Vec<PlaneKind> {
    let mut kinds = Vec::with_capacity(options.n_poloidal() + options.n_toroidal() + options.n_radial());
    kinds.extend(std::iter::repeat_n(PlaneKind::Poloidal, options.n_poloidal()));
    kinds.extend(std::iter::repeat_n(PlaneKind::Toroidal, options.n_toroidal()));
    kinds.extend(std::iter::repeat_n(PlaneKind::Radial, options.n_radial()));
    kinds
}

/// Crossings of one plane, ready for a scatter plot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoincareView {
    pub plane:  usize,
    pub kind:   PlaneKind,
    pub ids:    Vec<MarkerId>,
    pub x:      Vec<f64>,
    pub y:      Vec<f64>,
    /// Present when requested; aligned with `x`/`y`.
    pub conlen: Option<ConnectionLength>,
}

/// Gather the crossings of `plane`.
///
/// The run needs orbit samples tagged with plane indices, orbit-write
/// options and a final state.  When `lost` is given the connection length of
/// every crossing is computed with it as the lost end-condition set.
pub fn poincare(run: &RunOutput, plane: usize, lost: Option<EndCond>) -> MrkResult<PoincareView> {
    let (kind, samples) = plane_samples(run, plane)?;
    let (xname, yname) = kind.coordinates();
    let x = coordinate(&samples, xname)?;
    let y = coordinate(&samples, yname)?;

    let conlen = match lost {
        Some(lost) => Some(connection_length(
            run.require_endstate()?,
            samples.ids(),
            samples.mileage(),
            lost,
        )?),
        None => None,
    };

    Ok(PoincareView { plane, kind, ids: samples.ids().to_vec(), x, y, conlen })
}

/// Kind and orbit samples of `plane`, after checking that the run carries
/// a final state, plane-tagged orbits and orbit-write options.
pub(crate) fn plane_samples(run: &RunOutput, plane: usize) -> MrkResult<(PlaneKind, OrbitTable)> {
    run.capabilities().require(&[
        Capability::EndState,
        Capability::Orbit,
        Capability::Poincare,
        Capability::Options,
    ])?;

    let kinds = plane_kinds(run.require_options()?);
    let unknown = || MrkError::UnknownPlane { plane, available: kinds.len() };
    let kind = *kinds.get(plane).ok_or_else(unknown)?;
    let index = u32::try_from(plane).map_err(|_| unknown())?;
    Ok((kind, run.require_orbit()?.plane(index)?))
}

/// A plotting coordinate; `phimod`/`thetamod` fall back to `phi`/`theta`
/// wrapped into [0, 360) when not recorded directly.
fn coordinate(samples: &OrbitTable, name: &str) -> MrkResult<Vec<f64>> {
    let base = match name {
        "phimod"   => Some("phi"),
        "thetamod" => Some("theta"),
        _ => None,
    };
    match (samples.columns().get(name), base) {
        (Some(values), _) => Ok(values.to_vec()),
        (None, Some(base)) if samples.columns().contains(base) => Ok(samples
            .column(base)?
            .iter()
            .map(|deg| deg.rem_euclid(360.0))
            .collect()),
        _ => samples.column(name).map(<[f64]>::to_vec),
    }
}
