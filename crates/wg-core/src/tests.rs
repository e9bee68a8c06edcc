//! Unit tests for wg-core primitives.

#[cfg(test)]
mod helpers {
    use crate::GeoPoint;

    pub fn berlin() -> GeoPoint {
        GeoPoint::new(52.520008, 13.404954).unwrap()
    }

    pub fn paris() -> GeoPoint {
        GeoPoint::new(48.8566, 2.3522).unwrap()
    }

    pub fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }
}

// ── Value types ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod geo {
    use super::helpers::pt;
    use crate::{BoundingBox, GeoError, GeoPoint};

    #[test]
    fn accepts_range_edges() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = GeoPoint::new(90.0001, 0.0).unwrap_err();
        assert!(matches!(err, GeoError::OutOfRange { field: "latitude", .. }));
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        let err = GeoPoint::new(0.0, -180.5).unwrap_err();
        assert!(matches!(err, GeoError::OutOfRange { field: "longitude", .. }));
    }

    #[test]
    fn rejects_nan() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(pt(1.5, -2.25).to_string(), "(1.500000, -2.250000)");
    }

    #[test]
    fn unit_vector_is_unit_length() {
        let v = pt(37.0, -122.0).to_unit_vector();
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bbox_from_points() {
        let bbox = BoundingBox::from_points([pt(10.0, 20.0), pt(-5.0, 25.0), pt(3.0, 15.0)]).unwrap();
        assert_eq!(bbox.north(), 10.0);
        assert_eq!(bbox.south(), -5.0);
        assert_eq!(bbox.east(), 25.0);
        assert_eq!(bbox.west(), 15.0);
        assert_eq!(bbox.center(), pt(2.5, 20.0));
        assert!(bbox.contains(pt(0.0, 20.0)));
        assert!(!bbox.contains(pt(11.0, 20.0)));
    }

    #[test]
    fn bbox_from_no_points() {
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn bbox_single_point_has_zero_area() {
        let bbox = BoundingBox::from_points([pt(45.0, 7.0)]).unwrap();
        assert_eq!(bbox.area_km2(), 0.0);
    }

    #[test]
    fn bbox_new_rejects_inverted() {
        assert!(matches!(
            BoundingBox::new(-1.0, 1.0, 10.0, 0.0),
            Err(GeoError::InvalidArgument(_))
        ));
        assert!(matches!(
            BoundingBox::new(1.0, -1.0, 0.0, 10.0),
            Err(GeoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn bbox_one_degree_square_at_equator() {
        // ~111.19 km per degree on both axes at the equator.
        let bbox = BoundingBox::new(0.5, -0.5, 0.5, -0.5).unwrap();
        assert!((bbox.width_km() - 111.19).abs() < 0.1, "got {}", bbox.width_km());
        assert!((bbox.height_km() - 111.19).abs() < 0.1, "got {}", bbox.height_km());
    }

    #[test]
    fn bbox_width_follows_its_own_span() {
        // A box from -179 to 179 covers 358°, not the 2° short way round.
        let wide = BoundingBox::new(10.0, 0.0, 179.0, -179.0).unwrap();
        let narrow = BoundingBox::new(10.0, 0.0, 1.0, -1.0).unwrap();
        assert!((wide.width_km() / narrow.width_km() - 179.0).abs() < 1e-9);

        let globe = BoundingBox::new(0.0, 0.0, 180.0, -180.0).unwrap();
        let circumference = 2.0 * std::f64::consts::PI * crate::EARTH_RADIUS_KM;
        assert!((globe.width_km() - circumference).abs() < 1e-6, "got {}", globe.width_km());
    }

    #[test]
    fn game_point_distance() {
        let cfg = crate::MapConfig::default();
        let a = cfg.game_point(0.0, 0.0).unwrap();
        let b = cfg.game_point(3.0, 4.0).unwrap();
        assert_eq!(a.distance_to(b), 5.0);
    }
}

// ── Great-circle metrics ──────────────────────────────────────────────────────

#[cfg(test)]
mod metrics {
    use super::helpers::{berlin, paris, pt};
    use crate::metrics::{destination, midpoint};
    use crate::{bearing_degrees, distance_km};

    #[test]
    fn zero_distance() {
        let p = berlin();
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn berlin_paris_distance() {
        let d = distance_km(berlin(), paris());
        assert!((d - 878.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn berlin_paris_bearing() {
        let b = bearing_degrees(berlin(), paris());
        assert!((200.0..=250.0).contains(&b), "got {b}");
    }

    #[test]
    fn reverse_bearing_is_not_a_flip() {
        let fwd = bearing_degrees(berlin(), paris());
        let rev = bearing_degrees(paris(), berlin());
        let flipped = (fwd + 180.0) % 360.0;
        assert!((rev - flipped).abs() > 1.0, "fwd {fwd} rev {rev}");
    }

    #[test]
    fn cardinal_bearings() {
        let origin = pt(0.0, 0.0);
        assert!((bearing_degrees(origin, pt(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, pt(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, pt(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, pt(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_bearing_is_zero() {
        assert_eq!(bearing_degrees(paris(), paris()), 0.0);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let d = distance_km(pt(0.0, 0.0), pt(0.0, 180.0));
        assert!((d - std::f64::consts::PI * crate::EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn destination_inverts_distance_and_bearing() {
        let start = berlin();
        let end = destination(start, bearing_degrees(start, paris()), distance_km(start, paris()))
            .unwrap();
        assert!(distance_km(end, paris()) < 0.01, "landed at {end}");
    }

    #[test]
    fn destination_wraps_longitude() {
        let end = destination(pt(0.0, 179.5), 90.0, 111.19).unwrap();
        assert!(end.longitude() < -179.0, "got {end}");
    }

    #[test]
    fn destination_rejects_bad_arguments() {
        assert!(destination(paris(), f64::NAN, 1.0).is_err());
        assert!(destination(paris(), 0.0, -1.0).is_err());
    }

    #[test]
    fn midpoint_is_equidistant() {
        let m = midpoint(berlin(), paris());
        let d1 = distance_km(berlin(), m);
        let d2 = distance_km(m, paris());
        assert!((d1 - d2).abs() < 1e-6, "{d1} vs {d2}");
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod projection {
    use super::helpers::berlin;
    use crate::{GeoError, GeoPoint, MapConfig};

    #[test]
    fn origin_maps_to_center() {
        let cfg = MapConfig::default();
        let g = cfg.real_world_to_game(0.0, 0.0).unwrap();
        assert_eq!((g.x(), g.y()), (500.0, 500.0));
    }

    #[test]
    fn globe_corners_map_to_grid_corners() {
        let cfg = MapConfig::default();
        let ne = cfg.real_world_to_game(90.0, 180.0).unwrap();
        let sw = cfg.real_world_to_game(-90.0, -180.0).unwrap();
        assert!((ne.x() - 1000.0).abs() < 1e-9 && (ne.y() - 1000.0).abs() < 1e-9);
        assert!(sw.x().abs() < 1e-9 && sw.y().abs() < 1e-9);
    }

    #[test]
    fn north_is_up() {
        let cfg = MapConfig::default();
        let south = cfg.real_world_to_game(-10.0, 0.0).unwrap();
        let north = cfg.real_world_to_game(10.0, 0.0).unwrap();
        assert!(north.y() > south.y());
    }

    #[test]
    fn round_trip_berlin() {
        let cfg = MapConfig::default();
        let p = berlin();
        let g = cfg.real_world_to_game(p.latitude(), p.longitude()).unwrap();
        let back = cfg.game_to_real_world(g.x(), g.y()).unwrap();
        assert!((back.latitude() - p.latitude()).abs() < 1e-6);
        assert!((back.longitude() - p.longitude()).abs() < 1e-6);
    }

    #[test]
    fn invalid_lat_lon_rejected() {
        let cfg = MapConfig::default();
        assert!(matches!(
            cfg.real_world_to_game(95.0, 0.0),
            Err(GeoError::OutOfRange { field: "latitude", .. })
        ));
        assert!(matches!(
            cfg.real_world_to_game(0.0, 200.0),
            Err(GeoError::OutOfRange { field: "longitude", .. })
        ));
    }

    #[test]
    fn off_grid_rejected() {
        let cfg = MapConfig::default();
        assert!(matches!(
            cfg.game_to_real_world(-1.0, 10.0),
            Err(GeoError::OutOfRange { field: "x", .. })
        ));
        assert!(matches!(
            cfg.game_to_real_world(10.0, 1000.5),
            Err(GeoError::OutOfRange { field: "y", .. })
        ));
    }

    #[test]
    fn regional_map_rejects_far_points() {
        // Europe-centred map: 1 grid unit = 0.05° (~5.5 km).
        let cfg = MapConfig {
            origin: GeoPoint::new(50.0, 10.0).unwrap(),
            units_per_degree_lon: 20.0,
            units_per_degree_lat: 20.0,
            ..MapConfig::default()
        };
        assert!(cfg.real_world_to_game(52.52, 13.40).is_ok());
        assert!(matches!(
            cfg.real_world_to_game(-33.9, 18.4),
            Err(GeoError::OutOfRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_scale() {
        let cfg = MapConfig { units_per_degree_lat: 0.0, ..MapConfig::default() };
        assert!(matches!(cfg.validate(), Err(GeoError::InvalidArgument(_))));
        assert!(MapConfig::default().validate().is_ok());
    }
}

// ── Geohash ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod geohash {
    use super::helpers::{berlin, pt};
    use crate::geohash::{MAX_PRECISION, common_prefix_len, decode, encode};
    use crate::GeoError;

    #[test]
    fn known_vectors() {
        assert_eq!(encode(pt(57.64911, 10.40744), 11).unwrap(), "u4pruydqqvj");
        assert_eq!(encode(pt(42.6, -5.6), 5).unwrap(), "ezs42");
        assert_eq!(encode(pt(0.0, 0.0), 5).unwrap(), "s0000");
    }

    #[test]
    fn length_matches_precision() {
        for n in 1..=MAX_PRECISION {
            assert_eq!(encode(berlin(), n).unwrap().len(), n);
        }
    }

    #[test]
    fn shorter_hash_is_prefix_of_longer() {
        let long = encode(berlin(), 12).unwrap();
        let short = encode(berlin(), 6).unwrap();
        assert!(long.starts_with(&short));
    }

    #[test]
    fn invalid_precision() {
        assert!(matches!(encode(berlin(), 0), Err(GeoError::InvalidArgument(_))));
        assert!(matches!(encode(berlin(), MAX_PRECISION + 1), Err(GeoError::InvalidArgument(_))));
    }

    #[test]
    fn decode_contains_original_point() {
        let p = berlin();
        let hash = encode(p, 9).unwrap();
        let cell = decode(&hash).unwrap();
        assert!(cell.bounds.contains(p));
        assert_eq!(cell.precision, 9);
        let (lat_err, lon_err) = cell.error_degrees();
        assert!((cell.center().latitude() - p.latitude()).abs() <= lat_err);
        assert!((cell.center().longitude() - p.longitude()).abs() <= lon_err);
    }

    #[test]
    fn decode_is_case_insensitive() {
        assert_eq!(decode("EZS42").unwrap(), decode("ezs42").unwrap());
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert!(decode("").is_err());
        assert!(decode("ezs4a").is_err()); // 'a' is not in the alphabet
        assert!(decode(&"0".repeat(MAX_PRECISION + 1)).is_err());
    }

    #[test]
    fn prefix_len() {
        assert_eq!(common_prefix_len("u33dc0", "u33db2"), 4);
        assert_eq!(common_prefix_len("abc", "xyz"), 0);
        assert_eq!(common_prefix_len("abc", "ab"), 2);
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod serde_support {
    use crate::{GeoPoint, MapConfig};

    #[test]
    fn geo_point_deserialize_validates() {
        let ok: GeoPoint = serde_json::from_str(r#"{"latitude":1.0,"longitude":2.0}"#).unwrap();
        assert_eq!(ok, GeoPoint::new(1.0, 2.0).unwrap());
        let bad = serde_json::from_str::<GeoPoint>(r#"{"latitude":91.0,"longitude":2.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn map_config_fills_defaults() {
        let cfg: MapConfig = serde_json::from_str(r#"{"grid_width":400.0}"#).unwrap();
        assert_eq!(cfg.grid_width, 400.0);
        assert_eq!(cfg.grid_height, MapConfig::default().grid_height);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use crate::geohash::{common_prefix_len, encode};
    use crate::metrics::destination;
    use crate::{GeoPoint, MapConfig, bearing_degrees, distance_km};

    fn any_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap())
    }

    proptest! {
        #[test]
        fn projection_round_trip(p in any_point()) {
            let cfg = MapConfig::default();
            let g = cfg.real_world_to_game(p.latitude(), p.longitude()).unwrap();
            prop_assert!((0.0..=cfg.grid_width).contains(&g.x()));
            prop_assert!((0.0..=cfg.grid_height).contains(&g.y()));
            let back = cfg.game_to_real_world(g.x(), g.y()).unwrap();
            prop_assert!((back.latitude() - p.latitude()).abs() < 1e-6);
            prop_assert!((back.longitude() - p.longitude()).abs() < 1e-6);
        }

        #[test]
        fn distance_is_symmetric(a in any_point(), b in any_point()) {
            let ab = distance_km(a, b);
            let ba = distance_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-9, "{} vs {}", ab, ba);
            prop_assert!(ab >= 0.0);
            prop_assert!(ab <= std::f64::consts::PI * crate::EARTH_RADIUS_KM + 1e-6);
        }

        #[test]
        fn distance_to_self_is_zero(a in any_point()) {
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        #[test]
        fn bearing_in_range(a in any_point(), b in any_point()) {
            let bearing = bearing_degrees(a, b);
            prop_assert!((0.0..360.0).contains(&bearing), "bearing {}", bearing);
        }

        #[test]
        fn geohash_length_and_determinism(p in any_point(), n in 1usize..=12) {
            let h1 = encode(p, n).unwrap();
            let h2 = encode(p, n).unwrap();
            prop_assert_eq!(h1.len(), n);
            prop_assert_eq!(h1, h2);
        }

        #[test]
        fn destination_stays_valid(p in any_point(), bearing in 0.0f64..360.0, d in 0.0f64..20_000.0) {
            let end = destination(p, bearing, d).unwrap();
            prop_assert!((-90.0..=90.0).contains(&end.latitude()));
            prop_assert!((-180.0..=180.0).contains(&end.longitude()));
        }
    }

    /// Average shared-prefix length with a reference point falls as the
    /// distance from it grows.
    #[test]
    fn geohash_prefix_overlap_decreases_with_distance() {
        let origin = GeoPoint::new(48.137, 11.575).unwrap(); // Munich
        let reference = encode(origin, 12).unwrap();

        let mean_overlap = |distance: f64| -> f64 {
            let samples: Vec<usize> = (0..36)
                .map(|i| {
                    let p = destination(origin, f64::from(i) * 10.0, distance).unwrap();
                    common_prefix_len(&reference, &encode(p, 12).unwrap())
                })
                .collect();
            samples.iter().sum::<usize>() as f64 / samples.len() as f64
        };

        let near = mean_overlap(0.5);
        let mid = mean_overlap(20.0);
        let far = mean_overlap(1_000.0);
        assert!(near > mid, "near {near} mid {mid}");
        assert!(mid > far, "mid {mid} far {far}");
    }
}
