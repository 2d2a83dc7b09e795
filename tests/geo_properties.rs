/// Property-based tests using proptest
/// Tests invariants of the distance calculator that should hold for all inputs
use proptest::prelude::*;
use rust_dispatch_api::geo::{
    distance_km, haversine_km, Coordinate, EARTH_RADIUS_KM, UNREACHABLE_KM,
};

/// Half the spherical Earth's circumference, the farthest apart two points
/// can be.
const MAX_GREAT_CIRCLE_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_KM;

fn valid_coord() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0)
        .prop_map(|(lat, lng)| Coordinate::new(lat, lng).unwrap())
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in valid_coord(), b in valid_coord()) {
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        prop_assert!((ab - ba).abs() < 1e-6, "asymmetric: {} vs {}", ab, ba);
    }

    #[test]
    fn distance_to_self_is_zero(a in valid_coord()) {
        prop_assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn distance_is_bounded(a in valid_coord(), b in valid_coord()) {
        let d = haversine_km(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= MAX_GREAT_CIRCLE_KM + 1e-6, "too far: {}", d);
    }

    #[test]
    fn asin_form_agrees_with_atan2_form(a in valid_coord(), b in valid_coord()) {
        let via_asin = haversine_km(a, b);

        let h = ((b.lat - a.lat).to_radians() / 2.0).sin().powi(2)
            + a.lat.to_radians().cos()
                * b.lat.to_radians().cos()
                * ((b.lng - a.lng).to_radians() / 2.0).sin().powi(2);
        let via_atan2 = EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());

        prop_assert!((via_asin - via_atan2).abs() < 1e-6,
            "forms disagree: {} vs {}", via_asin, via_atan2);
    }

    #[test]
    fn absent_side_always_yields_sentinel(a in valid_coord()) {
        prop_assert_eq!(distance_km(Some(a), None), UNREACHABLE_KM);
        prop_assert_eq!(distance_km(None, Some(a)), UNREACHABLE_KM);
    }

    #[test]
    fn sentinel_exceeds_any_service_area_distance(
        a in valid_coord(),
        dlat in -1.0f64..=1.0,
        dlng in -1.0f64..=1.0,
    ) {
        // Within any plausible dispatch service area the sentinel dominates
        // every computed distance, which is what makes unlocated candidates
        // sort last.
        let lat = (a.lat + dlat).clamp(-90.0, 90.0);
        let lng = (a.lng + dlng).clamp(-180.0, 180.0);
        let b = Coordinate::new(lat, lng).unwrap();
        prop_assert!(haversine_km(a, b) < UNREACHABLE_KM);
    }

    #[test]
    fn coordinate_validation_never_panics(lat in proptest::num::f64::ANY, lng in proptest::num::f64::ANY) {
        let _ = Coordinate::new(lat, lng);
    }

    #[test]
    fn out_of_range_latitude_rejected(lat in 90.0001f64..1e6, lng in -180.0f64..=180.0) {
        prop_assert!(Coordinate::new(lat, lng).is_err());
        prop_assert!(Coordinate::new(-lat, lng).is_err());
    }
}
