//! Per-tile wall loads.
//!
//! Hits are grouped by tile with a stable sort on the tile ID followed by a
//! single pass over equal-key chunks.  The report is sparse: only tiles that
//! received a non-zero deposit appear, in ascending tile order.
//! [`WallLoadReport::to_dense`] expands a per-hit array when a renderer
//! needs one value per tile.

use mrk_core::{EndCond, MrkError, MrkResult, ScaledValue, TileId};
use mrk_state::StateTable;

// ── WallGeometry ──────────────────────────────────────────────────────────────

/// Area lookup for the tiles of a wall mesh.
///
/// Tile IDs are 1-based; `TileId::NONE` (0) never names a tile.
pub trait WallGeometry {
    /// Number of tiles in the mesh.
    fn tile_count(&self) -> usize;

    /// Surface area of `tile`, or `UnknownTile` if the mesh has no such tile.
    fn area(&self, tile: TileId) -> MrkResult<f64>;
}

/// [`WallGeometry`] over a dense area list; entry `i` is the area of tile
/// `i + 1`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileAreas {
    areas: Vec<f64>,
}

impl TileAreas {
    pub fn new(areas: Vec<f64>) -> Self {
        Self { areas }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.areas
    }
}

impl WallGeometry for TileAreas {
    fn tile_count(&self) -> usize {
        self.areas.len()
    }

    fn area(&self, tile: TileId) -> MrkResult<f64> {
        tile.index()
            .and_then(|i| self.areas.get(i).copied())
            .ok_or(MrkError::UnknownTile(tile))
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Sparse per-tile loads; every vector is parallel to `tile_ids`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallLoadReport {
    /// Distinct tiles hit, ascending.
    pub tile_ids:             Vec<TileId>,
    pub area:                 Vec<f64>,
    /// Σ weight·energy per tile.
    pub energy_deposited:     Vec<f64>,
    /// `energy_deposited / area`.
    pub power_density:        Vec<f64>,
    /// Σ weight per tile.
    pub particles_deposited:  Vec<f64>,
    pub particle_density:     Vec<f64>,
    pub markers_deposited:    Vec<usize>,
    /// Unweighted mean incidence angle per tile, when angles were supplied.
    pub mean_incidence_angle: Option<Vec<f64>>,
}

impl WallLoadReport {
    pub fn len(&self) -> usize {
        self.tile_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_ids.is_empty()
    }

    /// Σ area over hit tiles.
    pub fn wetted_area(&self) -> f64 {
        self.area.iter().sum()
    }

    /// Largest power density among hit tiles; `None` if nothing hit the wall.
    pub fn peak_power_density(&self) -> Option<f64> {
        self.power_density.iter().copied().reduce(f64::max)
    }

    /// Scatter `values` (parallel to `tile_ids`) onto a dense array of
    /// `n_tiles` entries, NaN where no marker landed.
    ///
    /// Tiles beyond `n_tiles` are dropped.
    pub fn to_dense(&self, values: &[f64], n_tiles: usize) -> MrkResult<Vec<f64>> {
        if values.len() != self.len() {
            return Err(MrkError::LengthMismatch {
                table:    "wall loads",
                field:    "values".to_owned(),
                expected: self.len(),
                got:      values.len(),
            });
        }
        let mut dense = vec![f64::NAN; n_tiles];
        for (tile, &v) in self.tile_ids.iter().zip(values) {
            if let Some(slot) = tile.index().and_then(|i| dense.get_mut(i)) {
                *slot = v;
            }
        }
        Ok(dense)
    }
}

/// Summary scalars of a wall-load report.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallFigures {
    pub wetted_area: f64,
    pub area_unit:   String,
    /// Peak power density with a magnitude-prefixed energy unit
    /// (e.g. `MJ/m^2`).
    pub peak_load:   ScaledValue,
}

impl WallFigures {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total wetted area: {:.2} {}", self.wetted_area, self.area_unit),
            format!("Peak load: {}", self.peak_load),
        ]
    }
}

/// Total wetted area and peak load of `report`.
///
/// An empty report has zero wetted area and a zero peak.
pub fn figures_of_merit(report: &WallLoadReport, energy_unit: &str, area_unit: &str) -> WallFigures {
    let peak = report.peak_power_density().unwrap_or(0.0);
    WallFigures {
        wetted_area: report.wetted_area(),
        area_unit:   area_unit.to_owned(),
        peak_load:   ScaledValue::by_magnitude(peak, energy_unit, Some(area_unit)),
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Aggregate deposition per tile over markers whose end condition
/// intersects `hit`.
///
/// `incidence`, if given, is one angle per row of `table`.  A hit marker
/// with no tile, or a tile the geometry does not know, is `UnknownTile`; a
/// tile with non-positive area is `ZeroDenominator`.  Tiles whose markers
/// all carry zero weight deposit nothing and are left out of the report.
pub fn wall_loads<G: WallGeometry + ?Sized>(
    table:     &StateTable,
    geometry:  &G,
    hit:       EndCond,
    incidence: Option<&[f64]>,
) -> MrkResult<WallLoadReport> {
    if let Some(angles) = incidence {
        if angles.len() != table.len() {
            return Err(MrkError::LengthMismatch {
                table:    table.kind().as_str(),
                field:    "incidence angle".to_owned(),
                expected: table.len(),
                got:      angles.len(),
            });
        }
    }

    let walltile = table.walltile();
    let mut hits: Vec<(TileId, usize)> = table
        .rows_with(Some(hit))
        .into_iter()
        .map(|row| (walltile[row], row))
        .collect();
    hits.sort_by_key(|&(tile, _)| tile);

    let groups = hits.chunk_by(|a, b| a.0 == b.0).count();
    let mut report = WallLoadReport {
        tile_ids:             Vec::with_capacity(groups),
        area:                 Vec::with_capacity(groups),
        energy_deposited:     Vec::with_capacity(groups),
        power_density:        Vec::with_capacity(groups),
        particles_deposited:  Vec::with_capacity(groups),
        particle_density:     Vec::with_capacity(groups),
        markers_deposited:    Vec::with_capacity(groups),
        mean_incidence_angle: incidence.map(|_| Vec::with_capacity(groups)),
    };

    let (weight, energy) = (table.weight(), table.energy());
    for group in hits.chunk_by(|a, b| a.0 == b.0) {
        let tile = group[0].0;
        if tile == TileId::NONE {
            return Err(MrkError::UnknownTile(tile));
        }
        let area = geometry.area(tile)?;
        if area <= 0.0 {
            return Err(MrkError::ZeroDenominator("tile load density"));
        }

        let (mut edepo, mut pdepo) = (0.0_f64, 0.0_f64);
        for &(_, row) in group {
            edepo += weight[row] * energy[row];
            pdepo += weight[row];
        }
        if pdepo == 0.0 && edepo == 0.0 {
            continue;
        }

        report.tile_ids.push(tile);
        report.area.push(area);
        report.energy_deposited.push(edepo);
        report.power_density.push(edepo / area);
        report.particles_deposited.push(pdepo);
        report.particle_density.push(pdepo / area);
        report.markers_deposited.push(group.len());
        if let (Some(means), Some(angles)) = (report.mean_incidence_angle.as_mut(), incidence) {
            let sum: f64 = group.iter().map(|&(_, row)| angles[row]).sum();
            means.push(sum / group.len() as f64);
        }
    }

    Ok(report)
}
