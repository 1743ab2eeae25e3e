//! Flat row types written by output backends, and their construction from
//! analysis reports.

use mrk_analysis::{CensusReport, ConnectionLength, LossReport, WallLoadReport};

/// Marker count of one end condition in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusRow {
    pub qid:   String,
    /// Raw end-condition bits; 0 is aborted.
    pub code:  u32,
    pub name:  String,
    pub count: u64,
}

impl CensusRow {
    pub fn from_report(qid: &str, report: &CensusReport) -> Vec<CensusRow> {
        report
            .entries
            .iter()
            .map(|e| CensusRow {
                qid:   qid.to_owned(),
                code:  e.code.0,
                name:  e.name.clone(),
                count: e.count as u64,
            })
            .collect()
    }
}

/// Loss summary of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LossRow {
    pub qid:                String,
    pub markers_lost:       u64,
    pub markers_fraction:   f64,
    pub particles_lost:     f64,
    pub particles_fraction: f64,
    pub energy_lost:        f64,
    pub energy_fraction:    f64,
}

impl LossRow {
    pub fn from_report(qid: &str, report: &LossReport) -> LossRow {
        LossRow {
            qid:                qid.to_owned(),
            markers_lost:       report.markers_lost as u64,
            markers_fraction:   report.markers_fraction,
            particles_lost:     report.particles_lost,
            particles_fraction: report.particles_fraction,
            energy_lost:        report.energy_lost,
            energy_fraction:    report.energy_fraction,
        }
    }
}

/// Load on one hit wall tile.
#[derive(Debug, Clone, PartialEq)]
pub struct WallLoadRow {
    pub qid:                  String,
    pub tile_id:              u32,
    pub area:                 f64,
    pub energy_deposited:     f64,
    pub power_density:        f64,
    pub particles_deposited:  f64,
    pub particle_density:     f64,
    pub markers_deposited:    u64,
    /// `None` when no incidence angles were supplied.
    pub mean_incidence_angle: Option<f64>,
}

impl WallLoadRow {
    pub fn from_report(qid: &str, report: &WallLoadReport) -> Vec<WallLoadRow> {
        (0..report.len())
            .map(|i| WallLoadRow {
                qid:                  qid.to_owned(),
                tile_id:              report.tile_ids[i].get(),
                area:                 report.area[i],
                energy_deposited:     report.energy_deposited[i],
                power_density:        report.power_density[i],
                particles_deposited:  report.particles_deposited[i],
                particle_density:     report.particle_density[i],
                markers_deposited:    report.markers_deposited[i] as u64,
                mean_incidence_angle: report.mean_incidence_angle.as_ref().map(|a| a[i]),
            })
            .collect()
    }
}

/// One orbit crossing of a plane with its connection length.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionLengthRow {
    pub qid:               String,
    pub plane:             u32,
    pub marker_id:         u64,
    pub mileage:           f64,
    /// Positive for lost markers, negative for confined ones.
    pub connection_length: f64,
    pub lost:              bool,
}

impl ConnectionLengthRow {
    pub fn from_conlen(qid: &str, plane: u32, conlen: &ConnectionLength) -> Vec<ConnectionLengthRow> {
        conlen
            .signed()
            .into_iter()
            .enumerate()
            .map(|(i, signed)| ConnectionLengthRow {
                qid: qid.to_owned(),
                plane,
                marker_id: conlen.ids[i].get(),
                mileage: conlen.mileage[i],
                connection_length: signed,
                lost: conlen.lost[i],
            })
            .collect()
    }
}
