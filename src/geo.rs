//! Geospatial primitives: validated coordinates and great-circle distance.
//!
//! Distance is the numeric foundation of both the ranking and pricing
//! pipelines. An unknown provider location is represented as an absent
//! coordinate and maps to the [`UNREACHABLE_KM`] sentinel, never to an error,
//! so a single unlocated candidate cannot abort a whole batch.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Mean Earth radius in kilometers (spherical model).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Sentinel distance for an unknown or unreachable location.
/// Must stay larger than any real-world great-circle distance so that
/// unlocated candidates sort last instead of being dropped.
pub const UNREACHABLE_KM: f64 = 9999.0;

/// A point on the globe in decimal degrees.
///
/// Construction validates the ranges, so any `Coordinate` held by the core
/// is known-good. An unknown location is `Option<Coordinate>::None`; it is
/// never encoded as (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, AppError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::Validation(format!(
                "latitude out of range: {}",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::Validation(format!(
                "longitude out of range: {}",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Builds from a pair of optional fields.
    ///
    /// Both fields absent is the unknown-location state. One field supplied
    /// without the other is rejected as malformed input.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Self>, AppError> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(Some(Self::new(lat, lng)?)),
            (None, None) => Ok(None),
            _ => Err(AppError::Validation(
                "latitude and longitude must be supplied together".to_string(),
            )),
        }
    }
}

/// Great-circle distance in kilometers between two known points.
///
/// Haversine formula on a spherical Earth of radius [`EARTH_RADIUS_KM`].
/// Pure function, no side effects.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Clamp before asin: rounding can push sqrt(h) a hair past 1 for
    // near-antipodal points.
    EARTH_RADIUS_KM * 2.0 * h.sqrt().min(1.0).asin()
}

/// Distance between two possibly-unknown points.
///
/// Either side absent yields [`UNREACHABLE_KM`] so downstream ranking sees
/// "unreachable" rather than a failure.
pub fn distance_km(a: Option<Coordinate>, b: Option<Coordinate>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => haversine_km(a, b),
        _ => UNREACHABLE_KM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = haversine_km(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn identical_points_are_zero_distance() {
        let a = coord(12.97, 77.59);
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn asin_and_atan2_forms_agree() {
        let pairs = [
            (coord(0.0, 0.0), coord(0.0, 1.0)),
            (coord(12.97, 77.59), coord(13.08, 80.27)),
            (coord(-33.86, 151.2), coord(51.5, -0.12)),
            (coord(89.9, 10.0), coord(-89.9, -170.0)),
        ];
        for (a, b) in pairs {
            let via_asin = haversine_km(a, b);
            let h = ((b.lat - a.lat).to_radians() / 2.0).sin().powi(2)
                + a.lat.to_radians().cos()
                    * b.lat.to_radians().cos()
                    * ((b.lng - a.lng).to_radians() / 2.0).sin().powi(2);
            let via_atan2 =
                EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
            assert!(
                (via_asin - via_atan2).abs() < 1e-6,
                "forms disagree: {} vs {}",
                via_asin,
                via_atan2
            );
        }
    }

    #[test]
    fn absent_location_yields_sentinel() {
        let a = coord(10.0, 10.0);
        assert_eq!(distance_km(Some(a), None), UNREACHABLE_KM);
        assert_eq!(distance_km(None, Some(a)), UNREACHABLE_KM);
        assert_eq!(distance_km(None, None), UNREACHABLE_KM);
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(-90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.1).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn from_parts_requires_both_or_neither() {
        assert!(Coordinate::from_parts(Some(1.0), Some(2.0))
            .unwrap()
            .is_some());
        assert!(Coordinate::from_parts(None, None).unwrap().is_none());
        assert!(Coordinate::from_parts(Some(1.0), None).is_err());
        assert!(Coordinate::from_parts(None, Some(2.0)).is_err());
    }
}
