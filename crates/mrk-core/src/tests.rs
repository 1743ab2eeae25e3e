//! Unit tests for mrk-core primitives.

#[cfg(test)]
mod ids {
    use crate::{MarkerId, TileId};

    #[test]
    fn ordering() {
        assert!(MarkerId(1) < MarkerId(2));
        assert!(TileId(100) > TileId(99));
    }

    #[test]
    fn tile_index_is_zero_based() {
        assert_eq!(TileId(1).index(), Some(0));
        assert_eq!(TileId(42).index(), Some(41));
        assert_eq!(TileId::NONE.index(), None);
    }

    #[test]
    fn display() {
        assert_eq!(MarkerId(7).to_string(), "MarkerId(7)");
        assert_eq!(TileId(3).to_string(), "TileId(3)");
    }
}

#[cfg(test)]
mod endcond {
    use crate::EndCond;

    #[test]
    fn flag_membership() {
        let code = EndCond::WALL | EndCond::TLIM;
        assert!(code.intersects(EndCond::WALL));
        assert!(code.intersects(EndCond::WALL | EndCond::RHOMAX));
        assert!(!code.intersects(EndCond::RHOMAX));
        assert!(!EndCond::NONE.intersects(EndCond::WALL));
    }

    #[test]
    fn names_parse() {
        assert_eq!(EndCond::from_name("wall"), Some(EndCond::WALL));
        assert_eq!(EndCond::from_name(" rhomax "), Some(EndCond::RHOMAX));
        assert_eq!(EndCond::from_name("aborted"), Some(EndCond::NONE));
        assert_eq!(EndCond::from_name("teleported"), None);
    }

    #[test]
    fn unknown_bits_detected() {
        assert!(EndCond::CPUMAX.is_known());
        assert!(!EndCond(0x200).is_known());
    }

    #[test]
    fn flags_iterate_in_bit_order() {
        let names: Vec<_> = (EndCond::RHOMAX | EndCond::TLIM).flags().map(|(_, n)| n).collect();
        assert_eq!(names, ["tlim", "rhomax"]);
    }
}

#[cfg(test)]
mod codes {
    use crate::{CodeTable, EndCond, ErrorKind, MrkError, StandardCodes};

    #[test]
    fn endcond_names() {
        let codes = StandardCodes;
        assert_eq!(codes.endcond_name(EndCond::NONE).unwrap(), "none");
        assert_eq!(codes.endcond_name(EndCond::WALL).unwrap(), "wall");
        assert_eq!(
            codes.endcond_name(EndCond::WALL | EndCond::TLIM).unwrap(),
            "tlim and wall"
        );
    }

    #[test]
    fn unknown_endcond_is_an_error() {
        let err = StandardCodes.endcond_name(EndCond(0x400)).unwrap_err();
        assert!(matches!(err, MrkError::UnknownCode { table: "endcond", code: 0x400 }));
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }

    #[test]
    fn error_tables_are_one_based() {
        let codes = StandardCodes;
        assert_eq!(codes.error_message(1).unwrap(), "Input evaluation failed");
        assert_eq!(
            codes.error_message(7).unwrap(),
            "Unphysical result when integrating marker coordinates"
        );
        assert_eq!(codes.error_module(1).unwrap(), "mccc_wiener.c");
        assert_eq!(codes.error_module(22).unwrap(), "mhd.c");
    }

    #[test]
    fn error_codes_out_of_range() {
        let codes = StandardCodes;
        assert!(codes.error_message(0).is_err());
        assert!(codes.error_message(8).is_err());
        assert!(codes.error_module(23).is_err());
    }
}

#[cfg(test)]
mod config {
    use crate::{AnalysisConfig, EndCond, OrbitWriteOptions};

    #[test]
    fn defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.loss_endcond, EndCond::WALL);
        assert!(cfg.lost_endconds.intersects(EndCond::RHOMAX));
        assert_eq!(cfg.energy_unit, "J");
    }

    #[test]
    fn negative_first_entry_disables_family() {
        let opt = OrbitWriteOptions {
            poloidal_angles:  vec![0.0, 180.0],
            toroidal_angles:  vec![-1.0],
            radial_distances: vec![],
        };
        assert_eq!(opt.n_poloidal(), 2);
        assert_eq!(opt.n_toroidal(), 0);
        assert_eq!(opt.n_radial(), 0);
    }
}

#[cfg(test)]
mod units {
    use crate::ScaledValue;

    #[test]
    fn picks_largest_prefix_keeping_value_above_one() {
        let v = ScaledValue::by_magnitude(2.5e7, "J", Some("m^2"));
        assert_eq!(v.unit, "MJ/m^2");
        assert!((v.value - 25.0).abs() < 1e-12);

        let g = ScaledValue::by_magnitude(3e9, "J", None);
        assert_eq!(g.unit, "GJ");
    }

    #[test]
    fn thresholds_are_inclusive() {
        let v = ScaledValue::by_magnitude(1000.0, "J", None);
        assert_eq!(v.unit, "KJ");
        assert_eq!(v.value, 1.0);
    }

    #[test]
    fn small_values_keep_base_unit() {
        let v = ScaledValue::by_magnitude(12.0, "J", Some("m^2"));
        assert_eq!(v.unit, "J/m^2");
        assert_eq!(v.value, 12.0);
        assert_eq!(v.to_string(), "12.00 J/m^2");
    }
}
