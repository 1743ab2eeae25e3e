//! Marker, particle and energy loss fractions.

use mrk_core::{EndCond, MrkError, MrkResult};
use mrk_state::StateTable;

/// Six-scalar loss summary of a final-state table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LossReport {
    pub markers_lost:       usize,
    pub markers_fraction:   f64,
    /// Σ weight over lost markers.
    pub particles_lost:     f64,
    pub particles_fraction: f64,
    /// Σ weight·energy over lost markers.
    pub energy_lost:        f64,
    pub energy_fraction:    f64,
}

impl LossReport {
    /// `"Markers lost: N (p% of total)"` style lines, percentages rounded to
    /// one decimal.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!(
                "Markers lost: {} ({:.1}% of total)",
                self.markers_lost,
                self.markers_fraction * 100.0
            ),
            format!(
                "Particles lost: {} ({:.1}% of total)",
                self.particles_lost,
                self.particles_fraction * 100.0
            ),
            format!(
                "Energy lost: {} ({:.1}% of total)",
                self.energy_lost,
                self.energy_fraction * 100.0
            ),
        ]
    }
}

/// Loss fractions of markers whose end condition passes `lost` (see
/// [`StateTable::rows_with`]).
///
/// All markers enter the denominators, including those with zero or negative
/// final energy.  A zero marker count, total weight or total weighted energy
/// is a [`MrkError::ZeroDenominator`].
pub fn loss_summary(table: &StateTable, lost: EndCond) -> MrkResult<LossReport> {
    if table.is_empty() {
        return Err(MrkError::ZeroDenominator("marker loss fraction"));
    }

    let mut markers_lost = 0usize;
    let (mut w_lost, mut w_total) = (0.0_f64, 0.0_f64);
    let (mut e_lost, mut e_total) = (0.0_f64, 0.0_f64);

    let mask = table.mask(Some(lost));
    for ((&is_lost, &w), &e) in mask.iter().zip(table.weight()).zip(table.energy()) {
        let we = w * e;
        w_total += w;
        e_total += we;
        if is_lost {
            markers_lost += 1;
            w_lost += w;
            e_lost += we;
        }
    }

    if w_total == 0.0 {
        return Err(MrkError::ZeroDenominator("particle loss fraction"));
    }
    if e_total == 0.0 {
        return Err(MrkError::ZeroDenominator("energy loss fraction"));
    }

    Ok(LossReport {
        markers_lost,
        markers_fraction:   markers_lost as f64 / table.len() as f64,
        particles_lost:     w_lost,
        particles_fraction: w_lost / w_total,
        energy_lost:        e_lost,
        energy_fraction:    e_lost / e_total,
    })
}
