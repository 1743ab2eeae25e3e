//! [`Analyzer`]: one run's tables plus the collaborators and configuration
//! every component needs.
//!
//! # Usage
//!
//! ```rust,ignore
//! let areas = TileAreas::new(tile_areas);
//! let analyzer = Analyzer::new(&run)
//!     .with_wall(&areas)
//!     .with_config(config);
//!
//! let census = analyzer.census()?;
//! let losses = analyzer.losses()?;
//! let loads  = analyzer.wall_loads(Some("iangle"))?;
//! let conlen = analyzer.connection_length(0)?;
//! ```
//!
//! Every method checks the run's capabilities first and returns
//! `MissingData` naming the absent table before doing any work.

use tracing::{debug, info};

use mrk_core::{AnalysisConfig, CodeTable, EndCond, MrkError, MrkResult, StandardCodes};
use mrk_state::{Capabilities, RunOutput};

use crate::{
    CensusReport, ConnectionLength, LossReport, PlaneKind, PoincareView, WallFigures,
    WallGeometry, WallLoadReport, connection_length, endcondition_census, figures_of_merit,
    loss_summary, plane_kinds, poincare, wall_loads,
};
use crate::poincare::plane_samples;

/// Analytics facade over a single run.
pub struct Analyzer<'a, C = StandardCodes> {
    run:    &'a RunOutput,
    codes:  C,
    wall:   Option<&'a dyn WallGeometry>,
    config: AnalysisConfig,
}

impl<'a> Analyzer<'a, StandardCodes> {
    /// Analyzer with the standard code tables, no wall geometry and default
    /// configuration.
    pub fn new(run: &'a RunOutput) -> Self {
        Self { run, codes: StandardCodes, wall: None, config: AnalysisConfig::default() }
    }
}

impl<'a, C: CodeTable> Analyzer<'a, C> {
    /// Replace the code tables used to name end conditions and errors.
    pub fn with_codes<D: CodeTable>(self, codes: D) -> Analyzer<'a, D> {
        Analyzer { run: self.run, codes, wall: self.wall, config: self.config }
    }

    pub fn with_wall(mut self, wall: &'a dyn WallGeometry) -> Self {
        self.wall = Some(wall);
        self
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn run(&self) -> &'a RunOutput {
        self.run
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.run.capabilities()
    }

    pub fn has_wall(&self) -> bool {
        self.wall.is_some()
    }

    // ── Components ────────────────────────────────────────────────────────

    pub fn census(&self) -> MrkResult<CensusReport> {
        let endstate = self.run.require_endstate()?;
        let report = endcondition_census(endstate, &self.codes)?;
        info!(
            qid = %self.run.qid,
            markers = report.total(),
            codes = report.entries.len(),
            errors = report.errors.len(),
            "end-condition census"
        );
        Ok(report)
    }

    pub fn losses(&self) -> MrkResult<LossReport> {
        let endstate = self.run.require_endstate()?;
        let report = loss_summary(endstate, self.config.loss_endcond)?;
        info!(
            qid = %self.run.qid,
            markers_lost = report.markers_lost,
            energy_fraction = report.energy_fraction,
            "loss summary"
        );
        Ok(report)
    }

    /// Wall loads of the markers that hit the wall.
    ///
    /// Selection is always the `wall` end condition, independent of
    /// `config.loss_endcond`: other loss channels carry no tile.
    ///
    /// `incidence` names the final-state column holding incidence angles.
    pub fn wall_loads(&self, incidence: Option<&str>) -> MrkResult<WallLoadReport> {
        let endstate = self.run.require_endstate()?;
        let wall = self.wall.ok_or_else(|| MrkError::MissingData("wall".to_owned()))?;
        let angles = incidence.map(|name| endstate.column(name)).transpose()?;
        let report = wall_loads(endstate, wall, EndCond::WALL, angles)?;
        info!(
            qid = %self.run.qid,
            tiles_hit = report.len(),
            tiles = wall.tile_count(),
            "wall loads"
        );
        Ok(report)
    }

    /// Wetted area and peak load in the configured units.
    pub fn wall_figures(&self) -> MrkResult<WallFigures> {
        let report = self.wall_loads(None)?;
        Ok(figures_of_merit(&report, &self.config.energy_unit, &self.config.area_unit))
    }

    /// Kinds of the recorded Poincaré planes, by plane index.
    pub fn planes(&self) -> MrkResult<Vec<PlaneKind>> {
        Ok(plane_kinds(self.run.require_options()?))
    }

    /// Connection length of every crossing of `plane`.
    pub fn connection_length(&self, plane: usize) -> MrkResult<ConnectionLength> {
        let (_, samples) = plane_samples(self.run, plane)?;
        let conlen = connection_length(
            self.run.require_endstate()?,
            samples.ids(),
            samples.mileage(),
            self.config.lost_endconds,
        )?;
        debug!(qid = %self.run.qid, plane, samples = conlen.len(), "connection length");
        Ok(conlen)
    }

    /// Crossings of `plane`, optionally with signed connection lengths.
    pub fn poincare(&self, plane: usize, with_conlen: bool) -> MrkResult<PoincareView> {
        let lost = with_conlen.then_some(self.config.lost_endconds);
        let view = poincare(self.run, plane, lost)?;
        debug!(qid = %self.run.qid, plane, kind = %view.kind, crossings = view.ids.len(), "poincare");
        Ok(view)
    }

    /// Final `x`,`y`,`z` of markers passing `filter`.
    pub fn point_cloud(&self, filter: Option<EndCond>) -> MrkResult<Vec<[f64; 3]>> {
        self.run.require_endstate()?.point_cloud(filter)
    }
}
