//! Unit tests for mrk-analysis.

use mrk_core::{EndCond, ErrorKind, MarkerId, MrkError, OrbitWriteOptions, TileId};
use mrk_state::{OrbitTable, OrbitTableBuilder, RunOutput, StateKind, StateTable, StateTableBuilder};

/// `(id, endcond, weight, energy, mileage, walltile)`
type Row = (u64, EndCond, f64, f64, f64, u32);

fn endstate(rows: &[Row]) -> StateTable {
    StateTableBuilder::new(StateKind::End, rows.iter().map(|r| MarkerId(r.0)).collect())
        .endcond(rows.iter().map(|r| r.1).collect())
        .errors(vec![0; rows.len()], vec![0; rows.len()], vec![0; rows.len()])
        .weight(rows.iter().map(|r| r.2).collect())
        .energy(rows.iter().map(|r| r.3).collect())
        .mileage(rows.iter().map(|r| r.4).collect())
        .walltile(rows.iter().map(|r| TileId(r.5)).collect())
        .build()
        .unwrap()
}

fn ids(raw: &[u64]) -> Vec<MarkerId> {
    raw.iter().copied().map(MarkerId).collect()
}

fn assert_close(got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len(), "{got:?} vs {want:?}");
    for (g, w) in got.iter().zip(want) {
        assert!((g - w).abs() < 1e-12, "{got:?} vs {want:?}");
    }
}

// ── EndconditionCensus ────────────────────────────────────────────────────────

#[cfg(test)]
mod census {
    use super::*;
    use crate::endcondition_census;
    use mrk_core::StandardCodes;

    fn table_with_errors() -> StateTable {
        let n = 5;
        StateTableBuilder::new(StateKind::End, ids(&[1, 2, 3, 4, 5]))
            .endcond(vec![
                EndCond::WALL,
                EndCond::NONE,
                EndCond::NONE,
                EndCond::TLIM,
                EndCond::WALL | EndCond::RHOMAX,
            ])
            .errors(vec![0, 5, 1, 0, 5], vec![0, 120, 10, 0, 120], vec![0, 2, 19, 0, 2])
            .weight(vec![1.0; n])
            .energy(vec![1.0; n])
            .mileage(vec![0.0; n])
            .walltile(vec![TileId(1), TileId::NONE, TileId::NONE, TileId::NONE, TileId(2)])
            .build()
            .unwrap()
    }

    #[test]
    fn entries_ascending_with_aborted() {
        let report = endcondition_census(&table_with_errors(), &StandardCodes).unwrap();
        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["aborted", "tlim", "wall", "wall and rhomax"]);
        let counts: Vec<usize> = report.entries.iter().map(|e| e.count).collect();
        assert_eq!(counts, [2, 1, 1, 1]);
        assert_eq!(report.total(), 5);
        assert_eq!(report.count(EndCond::NONE), 2);
        assert_eq!(report.count(EndCond::EMIN), 0);
    }

    #[test]
    fn duplicate_error_triples_collapse() {
        let report = endcondition_census(&table_with_errors(), &StandardCodes).unwrap();
        let lines: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "Error: Input evaluation failed at line 10 in B_field.c",
                "Error: Time step too small/zero/NaN at line 120 in mccc_push.c",
            ]
        );
    }

    #[test]
    fn rendered_lines() {
        let report = endcondition_census(&table_with_errors(), &StandardCodes).unwrap();
        let lines = report.lines();
        assert_eq!(lines[0], "End conditions:");
        assert_eq!(lines[1], "2 : aborted");
        assert_eq!(lines[4], "1 : wall and rhomax");
        assert_eq!(lines.len(), 1 + 4 + 2);
    }

    #[test]
    fn no_errors_no_error_lines() {
        let t = endstate(&[(1, EndCond::TLIM, 1.0, 1.0, 1.0, 0)]);
        let report = endcondition_census(&t, &StandardCodes).unwrap();
        assert!(report.errors.is_empty());
        assert_eq!(report.lines(), ["End conditions:", "1 : tlim"]);
    }

    #[test]
    fn unknown_message_code_fails() {
        let t = StateTableBuilder::new(StateKind::End, ids(&[1]))
            .endcond(vec![EndCond::NONE])
            .errors(vec![8], vec![1], vec![1])
            .weight(vec![1.0])
            .energy(vec![1.0])
            .mileage(vec![0.0])
            .walltile(vec![TileId::NONE])
            .build()
            .unwrap();
        let err = endcondition_census(&t, &StandardCodes).unwrap_err();
        assert!(matches!(err, MrkError::UnknownCode { table: "error message", code: 8 }));
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }

    #[test]
    fn unknown_endcond_bit_fails() {
        let t = endstate(&[(1, EndCond(0x200), 1.0, 1.0, 1.0, 0)]);
        let err = endcondition_census(&t, &StandardCodes).unwrap_err();
        assert!(matches!(err, MrkError::UnknownCode { table: "endcond", code: 0x200 }));
    }
}

// ── LossAggregator ────────────────────────────────────────────────────────────

#[cfg(test)]
mod loss {
    use super::*;
    use crate::loss_summary;

    #[test]
    fn fractions() {
        let t = endstate(&[
            (1, EndCond::WALL, 1.0, 10.0, 1.0, 3),
            (2, EndCond::TLIM, 2.0, 10.0, 1.0, 0),
            (3, EndCond::WALL, 3.0, 10.0, 1.0, 4),
            (4, EndCond::TLIM, 1.0, 0.0, 1.0, 0),
        ]);
        let r = loss_summary(&t, EndCond::WALL).unwrap();
        assert_eq!(r.markers_lost, 2);
        assert_eq!(r.markers_fraction, 0.5);
        assert_eq!(r.particles_lost, 4.0);
        assert_eq!(r.particles_fraction, 4.0 / 7.0);
        assert_eq!(r.energy_lost, 40.0);
        assert_eq!(r.energy_fraction, 40.0 / 60.0);
    }

    #[test]
    fn combined_flags_count_as_lost() {
        let t = endstate(&[
            (1, EndCond::WALL | EndCond::TLIM, 1.0, 1.0, 1.0, 3),
            (2, EndCond::TLIM, 1.0, 1.0, 1.0, 0),
        ]);
        let r = loss_summary(&t, EndCond::WALL).unwrap();
        assert_eq!(r.markers_lost, 1);
    }

    #[test]
    fn no_hits_is_exactly_zero() {
        let t = endstate(&[
            (1, EndCond::TLIM, 1.5, 2.0, 1.0, 0),
            (2, EndCond::RHOMAX, 0.5, 7.0, 1.0, 0),
        ]);
        let r = loss_summary(&t, EndCond::WALL).unwrap();
        assert_eq!(r.markers_fraction, 0.0);
        assert_eq!(r.particles_fraction, 0.0);
        assert_eq!(r.energy_fraction, 0.0);
    }

    #[test]
    fn single_marker_is_exactly_zero_or_one() {
        let lost = endstate(&[(1, EndCond::WALL, 0.3, 0.7, 1.0, 2)]);
        let r = loss_summary(&lost, EndCond::WALL).unwrap();
        assert_eq!(
            (r.markers_fraction, r.particles_fraction, r.energy_fraction),
            (1.0, 1.0, 1.0)
        );

        let kept = endstate(&[(1, EndCond::TLIM, 0.3, 0.7, 1.0, 0)]);
        let r = loss_summary(&kept, EndCond::WALL).unwrap();
        assert_eq!(
            (r.markers_fraction, r.particles_fraction, r.energy_fraction),
            (0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn empty_table_is_degenerate() {
        let err = loss_summary(&endstate(&[]), EndCond::WALL).unwrap_err();
        assert!(matches!(err, MrkError::ZeroDenominator(_)));
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
    }

    #[test]
    fn zero_weight_is_degenerate() {
        let t = endstate(&[(1, EndCond::WALL, 0.0, 1.0, 1.0, 1)]);
        let err = loss_summary(&t, EndCond::WALL).unwrap_err();
        assert!(matches!(err, MrkError::ZeroDenominator("particle loss fraction")));
    }

    #[test]
    fn zero_energy_is_degenerate() {
        let t = endstate(&[(1, EndCond::WALL, 1.0, 0.0, 1.0, 1)]);
        let err = loss_summary(&t, EndCond::WALL).unwrap_err();
        assert!(matches!(err, MrkError::ZeroDenominator("energy loss fraction")));
    }

    #[test]
    fn rendered_lines() {
        let t = endstate(&[
            (1, EndCond::WALL, 1.0, 1.0, 1.0, 3),
            (2, EndCond::TLIM, 1.0, 1.0, 1.0, 0),
            (3, EndCond::TLIM, 1.0, 1.0, 1.0, 0),
        ]);
        let lines = loss_summary(&t, EndCond::WALL).unwrap().lines();
        assert_eq!(lines[0], "Markers lost: 1 (33.3% of total)");
        assert_eq!(lines[1], "Particles lost: 1 (33.3% of total)");
        assert_eq!(lines[2], "Energy lost: 1 (33.3% of total)");
    }
}

// ── WallLoadAggregator ────────────────────────────────────────────────────────

#[cfg(test)]
mod wall {
    use super::*;
    use crate::{TileAreas, WallGeometry, figures_of_merit, wall_loads};

    fn geometry() -> TileAreas {
        TileAreas::new(vec![2.0; 10])
    }

    fn hits() -> StateTable {
        endstate(&[
            (1, EndCond::WALL, 1.0, 1.0e6, 0.1, 7),
            (2, EndCond::WALL, 2.0, 1.0e6, 0.1, 3),
            (3, EndCond::TLIM, 5.0, 1.0e6, 0.1, 0),
            (4, EndCond::WALL, 3.0, 2.0e6, 0.1, 7),
        ])
    }

    #[test]
    fn tile_areas_lookup() {
        let g = TileAreas::new(vec![1.0, 2.5]);
        assert_eq!(g.tile_count(), 2);
        assert_eq!(g.area(TileId(2)).unwrap(), 2.5);
        assert!(matches!(g.area(TileId(3)), Err(MrkError::UnknownTile(TileId(3)))));
        assert!(matches!(g.area(TileId::NONE), Err(MrkError::UnknownTile(_))));
    }

    #[test]
    fn sparse_sorted_tiles() {
        let r = wall_loads(&hits(), &geometry(), EndCond::WALL, None).unwrap();
        assert_eq!(r.tile_ids, [TileId(3), TileId(7)]);
        assert_eq!(r.energy_deposited, [2.0e6, 7.0e6]);
        assert_eq!(r.particles_deposited, [2.0, 4.0]);
        assert_eq!(r.power_density, [1.0e6, 3.5e6]);
        assert_eq!(r.particle_density, [1.0, 2.0]);
        assert_eq!(r.markers_deposited, [1, 2]);
        assert_eq!(r.area, [2.0, 2.0]);
        assert!(r.mean_incidence_angle.is_none());
    }

    #[test]
    fn mean_incidence_angle() {
        let angles = [10.0, 40.0, 0.0, 30.0];
        let r = wall_loads(&hits(), &geometry(), EndCond::WALL, Some(&angles[..])).unwrap();
        assert_eq!(r.mean_incidence_angle, Some(vec![40.0, 20.0]));
    }

    #[test]
    fn incidence_length_checked() {
        let err = wall_loads(&hits(), &geometry(), EndCond::WALL, Some(&[1.0][..])).unwrap_err();
        assert!(matches!(err, MrkError::LengthMismatch { expected: 4, got: 1, .. }));
    }

    #[test]
    fn no_hits_is_empty() {
        let t = endstate(&[(1, EndCond::TLIM, 1.0, 1.0, 1.0, 0)]);
        let r = wall_loads(&t, &geometry(), EndCond::WALL, None).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.peak_power_density(), None);
        assert_eq!(r.wetted_area(), 0.0);
    }

    #[test]
    fn single_marker_single_tile() {
        let t = endstate(&[(1, EndCond::WALL, 1.0, 1.0, 1.0, 4)]);
        let r = wall_loads(&t, &geometry(), EndCond::WALL, None).unwrap();
        assert_eq!(r.tile_ids, [TileId(4)]);
    }

    #[test]
    fn tile_outside_geometry() {
        let t = endstate(&[(1, EndCond::WALL, 1.0, 1.0, 1.0, 11)]);
        let err = wall_loads(&t, &geometry(), EndCond::WALL, None).unwrap_err();
        assert!(matches!(err, MrkError::UnknownTile(TileId(11))));
    }

    #[test]
    fn wall_hit_without_tile() {
        let t = endstate(&[(1, EndCond::WALL, 1.0, 1.0, 1.0, 0)]);
        let err = wall_loads(&t, &geometry(), EndCond::WALL, None).unwrap_err();
        assert!(matches!(err, MrkError::UnknownTile(TileId::NONE)));
    }

    #[test]
    fn zero_area_tile() {
        let g = TileAreas::new(vec![0.0]);
        let t = endstate(&[(1, EndCond::WALL, 1.0, 1.0, 1.0, 1)]);
        let err = wall_loads(&t, &g, EndCond::WALL, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
    }

    #[test]
    fn zero_weight_tile_left_out() {
        let t = endstate(&[
            (1, EndCond::WALL, 1.0, 1.0e3, 1.0, 1),
            (2, EndCond::WALL, 0.0, 1.0e3, 1.0, 2),
        ]);
        let r = wall_loads(&t, &geometry(), EndCond::WALL, None).unwrap();
        assert_eq!(r.tile_ids, [TileId(1)]);
        assert_eq!(r.particles_deposited, [1.0]);
        assert_eq!(r.markers_deposited, [1]);
    }

    #[test]
    fn dense_scatter() {
        let r = wall_loads(&hits(), &geometry(), EndCond::WALL, None).unwrap();
        let dense = r.to_dense(&r.power_density, 8).unwrap();
        assert_eq!(dense.len(), 8);
        assert_eq!(dense[2], 1.0e6);
        assert_eq!(dense[6], 3.5e6);
        let nan = dense.iter().filter(|v| v.is_nan()).count();
        assert_eq!(nan, 6);

        assert!(r.to_dense(&[1.0], 8).is_err());
    }

    #[test]
    fn figures() {
        let r = wall_loads(&hits(), &geometry(), EndCond::WALL, None).unwrap();
        let f = figures_of_merit(&r, "J", "m^2");
        assert_eq!(f.wetted_area, 4.0);
        assert_eq!(f.peak_load.value, 3.5);
        assert_eq!(f.peak_load.unit, "MJ/m^2");
        assert_eq!(f.lines(), ["Total wetted area: 4.00 m^2", "Peak load: 3.50 MJ/m^2"]);
    }

    #[test]
    fn idempotent() {
        let (t, g) = (hits(), geometry());
        let a = wall_loads(&t, &g, EndCond::WALL, None).unwrap();
        let b = wall_loads(&t, &g, EndCond::WALL, None).unwrap();
        assert_eq!(a, b);
    }
}

// ── OrbitRunDecoder ───────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use super::*;
    use crate::{RunIndex, decode_runs};

    #[test]
    fn first_appearance_order() {
        let runs = decode_runs(&ids(&[1, 1, 1, 2, 2, 5, 5, 5, 5])).unwrap();
        assert_eq!(runs, [(MarkerId(1), 3), (MarkerId(2), 2), (MarkerId(5), 4)]);
    }

    #[test]
    fn unsorted_but_contiguous() {
        let runs = decode_runs(&ids(&[5, 5, 2, 2, 2])).unwrap();
        assert_eq!(runs, [(MarkerId(5), 2), (MarkerId(2), 3)]);
    }

    #[test]
    fn single_marker_and_empty() {
        assert_eq!(decode_runs(&ids(&[4, 4, 4])).unwrap(), [(MarkerId(4), 3)]);
        assert!(decode_runs(&[]).unwrap().is_empty());
        let index = RunIndex::decode(&[]).unwrap();
        assert_eq!(index.offsets(), [0]);
        assert_eq!(index.sample_count(), 0);
    }

    #[test]
    fn non_contiguous_rejected() {
        let err = decode_runs(&ids(&[1, 2, 1])).unwrap_err();
        assert!(matches!(err, MrkError::NonContiguousRun { id: MarkerId(1), position: 2 }));
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }

    #[test]
    fn offsets_and_runs() {
        let index = RunIndex::decode(&ids(&[1, 1, 2, 3, 3, 3])).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.offsets(), [0, 2, 3, 6]);
        let last = index.runs()[2];
        assert_eq!((last.start, last.end()), (3, 6));
    }

    #[test]
    fn broadcast() {
        let index = RunIndex::decode(&ids(&[1, 1, 2, 3, 3, 3])).unwrap();
        assert_eq!(index.broadcast(&['a', 'b', 'c']).unwrap(), ['a', 'a', 'b', 'c', 'c', 'c']);
        let err = index.broadcast(&[1.0]).unwrap_err();
        assert!(matches!(err, MrkError::LengthMismatch { expected: 3, got: 1, .. }));
    }
}

// ── ConnectionLengthComputer ──────────────────────────────────────────────────

#[cfg(test)]
mod conlen {
    use super::*;
    use crate::connection_length;

    const LOST: EndCond = EndCond(EndCond::WALL.0 | EndCond::RHOMAX.0);

    #[test]
    fn lost_marker_keeps_sign() {
        let t = endstate(&[(7, EndCond::WALL, 1.0, 1.0, 1.0, 2)]);
        let c = connection_length(&t, &ids(&[7, 7, 7]), &[0.1, 0.4, 0.9], LOST).unwrap();
        assert_close(&c.length, &[0.9, 0.6, 0.1]);
        assert_eq!(c.lost, [true, true, true]);
        assert_close(&c.signed(), &[0.9, 0.6, 0.1]);
    }

    #[test]
    fn confined_marker_is_negated() {
        let t = endstate(&[(7, EndCond::TLIM, 1.0, 1.0, 1.0, 0)]);
        let c = connection_length(&t, &ids(&[7, 7, 7]), &[0.1, 0.4, 0.9], LOST).unwrap();
        assert_close(&c.length, &[0.9, 0.6, 0.1]);
        assert_close(&c.signed(), &[-0.9, -0.6, -0.1]);
    }

    #[test]
    fn rhomax_counts_as_lost() {
        let t = endstate(&[(7, EndCond::RHOMAX, 1.0, 1.0, 2.0, 0)]);
        let c = connection_length(&t, &ids(&[7]), &[0.5], LOST).unwrap();
        assert_eq!(c.signed(), [1.5]);
    }

    #[test]
    fn broadcasts_per_marker() {
        let t = endstate(&[
            (1, EndCond::TLIM, 1.0, 1.0, 10.0, 0),
            (2, EndCond::WALL, 1.0, 1.0, 4.0, 1),
        ]);
        let c = connection_length(&t, &ids(&[2, 2, 1, 1, 1]), &[1.0, 2.0, 1.0, 5.0, 9.0], LOST)
            .unwrap();
        assert_eq!(c.length, [3.0, 2.0, 9.0, 5.0, 1.0]);
        assert_eq!(c.signed(), [3.0, 2.0, -9.0, -5.0, -1.0]);
        assert_eq!(c.ids, ids(&[2, 2, 1, 1, 1]));
    }

    #[test]
    fn unknown_marker_rejected() {
        let t = endstate(&[(1, EndCond::WALL, 1.0, 1.0, 1.0, 1)]);
        let err = connection_length(&t, &ids(&[1, 3]), &[0.1, 0.2], LOST).unwrap_err();
        assert!(matches!(err, MrkError::UnknownMarker(MarkerId(3))));
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }

    #[test]
    fn non_contiguous_rejected() {
        let t = endstate(&[
            (1, EndCond::WALL, 1.0, 1.0, 1.0, 1),
            (2, EndCond::WALL, 1.0, 1.0, 1.0, 1),
        ]);
        let err = connection_length(&t, &ids(&[1, 2, 1]), &[0.1, 0.2, 0.3], LOST).unwrap_err();
        assert!(matches!(err, MrkError::NonContiguousRun { .. }));
    }

    #[test]
    fn mileage_length_checked() {
        let t = endstate(&[(1, EndCond::WALL, 1.0, 1.0, 1.0, 1)]);
        let err = connection_length(&t, &ids(&[1, 1]), &[0.1], LOST).unwrap_err();
        assert!(matches!(err, MrkError::LengthMismatch { .. }));
    }

    #[test]
    fn idempotent() {
        let t = endstate(&[(1, EndCond::TLIM, 1.0, 1.0, 3.3, 0)]);
        let (i, m) = (ids(&[1, 1]), [0.7, 1.9]);
        let a = connection_length(&t, &i, &m, LOST).unwrap();
        let b = connection_length(&t, &i, &m, LOST).unwrap();
        assert_eq!(a.signed(), b.signed());
    }
}

// ── Poincaré planes ───────────────────────────────────────────────────────────

#[cfg(test)]
mod poincare {
    use super::*;
    use crate::{PlaneKind, plane_kinds, poincare};

    fn options() -> OrbitWriteOptions {
        OrbitWriteOptions {
            poloidal_angles:  vec![0.0, 180.0],
            toroidal_angles:  vec![45.0],
            radial_distances: vec![-1.0],
        }
    }

    fn orbit() -> OrbitTable {
        OrbitTableBuilder::new(ids(&[1, 1, 1, 1, 2, 2]))
            .mileage(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
            .pncrid(vec![0, 2, 0, 1, 0, 2])
            .column("r", vec![6.1, 6.2, 6.3, 6.4, 6.5, 6.6])
            .column("z", vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
            .column("rho", vec![0.5, 0.6, 0.7, 0.8, 0.9, 1.0])
            .column("phi", vec![10.0, 370.0, 20.0, 30.0, 40.0, -30.0])
            .build()
            .unwrap()
    }

    fn run() -> RunOutput {
        RunOutput::new("run1")
            .with_endstate(endstate(&[
                (1, EndCond::WALL, 1.0, 1.0, 1.0, 1),
                (2, EndCond::TLIM, 1.0, 1.0, 2.0, 0),
            ]))
            .with_orbit(orbit())
            .with_options(options())
    }

    #[test]
    fn kinds_in_plane_order() {
        assert_eq!(
            plane_kinds(&options()),
            [PlaneKind::Poloidal, PlaneKind::Poloidal, PlaneKind::Toroidal]
        );
        assert_eq!(PlaneKind::Radial.coordinates(), ("thetamod", "phimod"));
        assert_eq!(PlaneKind::Toroidal.to_string(), "tor");
    }

    #[test]
    fn poloidal_plane() {
        let view = poincare(&run(), 0, None).unwrap();
        assert_eq!(view.kind, PlaneKind::Poloidal);
        assert_eq!(view.ids, ids(&[1, 1, 2]));
        assert_eq!(view.x, [6.1, 6.3, 6.5]);
        assert_eq!(view.y, [0.1, 0.3, 0.5]);
        assert!(view.conlen.is_none());
    }

    #[test]
    fn toroidal_plane_wraps_phi() {
        let view = poincare(&run(), 2, Some(EndCond::WALL)).unwrap();
        assert_eq!(view.kind, PlaneKind::Toroidal);
        assert_eq!(view.x, [0.6, 1.0]);
        assert_eq!(view.y, [10.0, 330.0]);
        let conlen = view.conlen.unwrap();
        assert_close(&conlen.signed(), &[0.8, -1.4]);
    }

    #[test]
    fn unknown_plane() {
        let err = poincare(&run(), 3, None).unwrap_err();
        assert!(matches!(err, MrkError::UnknownPlane { plane: 3, available: 3 }));
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
    }

    #[test]
    fn requires_options() {
        let mut run = run();
        run.options = None;
        let err = poincare(&run, 0, None).unwrap_err();
        assert_eq!(err.to_string(), "output does not contain options, which is required");
    }

    #[test]
    fn requires_plane_tags() {
        let orbit = OrbitTableBuilder::new(ids(&[1])).mileage(vec![0.1]).build().unwrap();
        let run = run().with_orbit(orbit);
        let err = poincare(&run, 0, None).unwrap_err();
        assert!(matches!(err, MrkError::MissingData(ref what) if what == "orbit(poincare)"));
    }
}

// ── Analyzer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod analyzer {
    use super::*;
    use crate::{Analyzer, TileAreas};
    use mrk_core::AnalysisConfig;

    fn run() -> RunOutput {
        let orbit = OrbitTableBuilder::new(ids(&[1, 1, 2, 2]))
            .mileage(vec![0.2, 0.6, 1.0, 1.5])
            .pncrid(vec![0, 0, 0, 0])
            .column("r", vec![6.0; 4])
            .column("z", vec![0.0; 4])
            .build()
            .unwrap();
        RunOutput::new("run1")
            .with_endstate(endstate(&[
                (1, EndCond::WALL, 1.0, 2.0e3, 1.0, 2),
                (2, EndCond::TLIM, 1.0, 1.0e3, 2.0, 0),
            ]))
            .with_orbit(orbit)
            .with_options(OrbitWriteOptions {
                poloidal_angles:  vec![0.0],
                toroidal_angles:  vec![],
                radial_distances: vec![],
            })
    }

    #[test]
    fn full_pass() {
        let run = run();
        let areas = TileAreas::new(vec![1.0, 0.5]);
        let a = Analyzer::new(&run).with_wall(&areas);

        assert_eq!(a.census().unwrap().total(), 2);
        assert_eq!(a.losses().unwrap().markers_lost, 1);

        let loads = a.wall_loads(None).unwrap();
        assert_eq!(loads.tile_ids, [TileId(2)]);

        let figures = a.wall_figures().unwrap();
        assert_eq!(figures.wetted_area, 0.5);
        assert_eq!(figures.peak_load.unit, "KJ/m^2");
        assert_eq!(figures.peak_load.value, 4.0);

        let conlen = a.connection_length(0).unwrap();
        assert_close(&conlen.signed(), &[0.8, 0.4, -1.0, -0.5]);
    }

    #[test]
    fn config_changes_lost_set() {
        let run = run();
        let config = AnalysisConfig { lost_endconds: EndCond::TLIM, ..AnalysisConfig::default() };
        let a = Analyzer::new(&run).with_config(config);
        let conlen = a.connection_length(0).unwrap();
        assert_eq!(conlen.lost, [false, false, true, true]);
    }

    #[test]
    fn missing_endstate() {
        let run = RunOutput::new("empty");
        let a = Analyzer::new(&run);
        let err = a.census().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingData);
        assert_eq!(err.to_string(), "output does not contain endstate, which is required");
        assert!(a.losses().is_err());
        assert!(a.point_cloud(None).is_err());
    }

    #[test]
    fn wall_loads_need_geometry() {
        let run = run();
        let a = Analyzer::new(&run);
        assert!(!a.has_wall());
        let err = a.wall_loads(None).unwrap_err();
        assert!(matches!(err, MrkError::MissingData(ref what) if what == "wall"));
    }

    #[test]
    fn incidence_column_must_exist() {
        let run = run();
        let areas = TileAreas::new(vec![1.0, 0.5]);
        let a = Analyzer::new(&run).with_wall(&areas);
        let err = a.wall_loads(Some("iangle")).unwrap_err();
        assert!(matches!(err, MrkError::MissingField { .. }));
    }

    #[test]
    fn unknown_plane() {
        let run = run();
        let err = Analyzer::new(&run).connection_length(1).unwrap_err();
        assert!(matches!(err, MrkError::UnknownPlane { plane: 1, available: 1 }));
    }

    #[test]
    fn wall_loads_ignore_wider_loss_set() {
        let run = RunOutput::new("run2").with_endstate(endstate(&[
            (1, EndCond::WALL, 1.0, 1.0e3, 1.0, 2),
            (2, EndCond::RHOMAX, 1.0, 1.0e3, 1.0, 0),
        ]));
        let areas = TileAreas::new(vec![1.0, 0.5]);
        let config = AnalysisConfig {
            loss_endcond: EndCond::WALL | EndCond::RHOMAX,
            ..AnalysisConfig::default()
        };
        let a = Analyzer::new(&run).with_wall(&areas).with_config(config);

        assert_eq!(a.losses().unwrap().markers_lost, 2);
        let loads = a.wall_loads(None).unwrap();
        assert_eq!(loads.tile_ids, [TileId(2)]);
        assert_eq!(loads.markers_deposited, [1]);
    }

    #[test]
    fn connection_length_and_poincare_agree_on_planes() {
        let run = run();
        let a = Analyzer::new(&run);
        let view = a.poincare(0, true).unwrap();
        assert_eq!(view.conlen.unwrap(), a.connection_length(0).unwrap());

        let err = a.poincare(1, true).unwrap_err();
        assert!(matches!(err, MrkError::UnknownPlane { plane: 1, available: 1 }));

        let bare = RunOutput::new("bare").with_endstate(endstate(&[(1, EndCond::WALL, 1.0, 1.0, 1.0, 1)]));
        let a = Analyzer::new(&bare);
        assert_eq!(a.connection_length(0).unwrap_err().kind(), ErrorKind::MissingData);
        assert_eq!(a.poincare(0, false).unwrap_err().kind(), ErrorKind::MissingData);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use super::*;
    use crate::{TileAreas, decode_runs, endcondition_census, loss_summary, wall_loads};
    use mrk_core::StandardCodes;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn endcond() -> impl Strategy<Value = EndCond> {
        prop::sample::select(vec![
            EndCond::NONE,
            EndCond::TLIM,
            EndCond::WALL,
            EndCond::RHOMAX,
            EndCond::WALL | EndCond::RHOMAX,
        ])
    }

    fn rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec((endcond(), 0.1f64..10.0, 0.1f64..1e6, 1u32..=20), 1..60).prop_map(
            |cols| {
                cols.into_iter()
                    .enumerate()
                    .map(|(i, (ec, w, e, tile))| (i as u64 + 1, ec, w, e, 1.0, tile))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn census_counts_sum_to_markers(rows in rows()) {
            let t = endstate(&rows);
            let report = endcondition_census(&t, &StandardCodes).unwrap();
            prop_assert_eq!(report.total(), rows.len());
            let codes: Vec<u32> = report.entries.iter().map(|e| e.code.0).collect();
            prop_assert!(codes.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn loss_fractions_bounded(rows in rows()) {
            let r = loss_summary(&endstate(&rows), EndCond::WALL).unwrap();
            for f in [r.markers_fraction, r.particles_fraction, r.energy_fraction] {
                prop_assert!((0.0..=1.0).contains(&f));
            }
        }

        #[test]
        fn wall_tiles_are_distinct_hit_tiles(rows in rows()) {
            let t = endstate(&rows);
            let r = wall_loads(&t, &TileAreas::new(vec![1.0; 20]), EndCond::WALL, None).unwrap();
            let expected: BTreeSet<TileId> = rows
                .iter()
                .filter(|r| r.1.intersects(EndCond::WALL))
                .map(|r| TileId(r.5))
                .collect();
            prop_assert_eq!(r.tile_ids.clone(), expected.into_iter().collect::<Vec<_>>());
            prop_assert!(r.energy_deposited.iter().all(|&e| e > 0.0));
            prop_assert!(r.particles_deposited.iter().all(|&p| p > 0.0));
            let markers: usize = r.markers_deposited.iter().sum();
            prop_assert_eq!(markers, t.rows_with(Some(EndCond::WALL)).len());
        }

        #[test]
        fn run_lengths_sum_to_samples(lens in prop::collection::vec(1usize..6, 0..30)) {
            let flat: Vec<MarkerId> = lens
                .iter()
                .enumerate()
                .flat_map(|(k, &n)| std::iter::repeat_n(MarkerId(k as u64 * 3 + 1), n))
                .collect();
            let runs = decode_runs(&flat).unwrap();
            prop_assert_eq!(runs.len(), lens.len());
            prop_assert_eq!(runs.iter().map(|r| r.1).sum::<usize>(), flat.len());
            let got: Vec<usize> = runs.iter().map(|r| r.1).collect();
            prop_assert_eq!(got, lens);
        }
    }
}
