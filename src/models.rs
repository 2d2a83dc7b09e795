//! Request/response models for the dispatch API boundary.
//!
//! Wire field names are the contract with the dispatch and billing
//! frontends; the billing side uses `Pascal_Snake` names, mapped with
//! `#[serde(rename)]`. Each wire type converts into a validated domain type
//! with defaults applied, so the engines never see raw optionals.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::geo::Coordinate;
use crate::pricing::PriceQuote;

// ============ Ranking endpoint ============

/// One serviceman entry as submitted by the dispatch frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicemanInput {
    /// Opaque identifier, unique within a request.
    pub id: String,
    pub full_name: Option<String>,
    pub base_cost: Option<f64>,
    pub rating: Option<f64>,
    /// Absent coordinates mean the location is unknown, not (0, 0).
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
}

/// POST /api/v1/rank request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub user_lat: f64,
    pub user_lng: f64,
    #[serde(default)]
    pub service_type: Option<String>,
    pub servicemen: Vec<ServicemanInput>,
}

/// A candidate with defaults applied and its location validated.
#[derive(Debug, Clone)]
pub struct ProviderCandidate {
    pub id: String,
    pub full_name: String,
    pub base_cost: f64,
    pub rating: f64,
    /// `None` marks the candidate unreachable for distance purposes.
    pub location: Option<Coordinate>,
}

impl TryFrom<&ServicemanInput> for ProviderCandidate {
    type Error = AppError;

    fn try_from(input: &ServicemanInput) -> Result<Self, AppError> {
        Ok(Self {
            id: input.id.clone(),
            full_name: input.full_name.clone().unwrap_or_default(),
            base_cost: input.base_cost.unwrap_or(0.0),
            rating: input.rating.unwrap_or(0.0),
            location: Coordinate::from_parts(input.location_lat, input.location_lng)?,
        })
    }
}

/// Validated ranking query: customer location plus candidates in input order.
#[derive(Debug, Clone)]
pub struct EtaQuery {
    pub user_location: Coordinate,
    pub service_type: String,
    pub candidates: Vec<ProviderCandidate>,
}

impl TryFrom<&RankRequest> for EtaQuery {
    type Error = AppError;

    fn try_from(req: &RankRequest) -> Result<Self, AppError> {
        let user_location = Coordinate::new(req.user_lat, req.user_lng)?;
        let candidates = req
            .servicemen
            .iter()
            .map(ProviderCandidate::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            user_location,
            service_type: req.service_type.clone().unwrap_or_default(),
            candidates,
        })
    }
}

/// One entry of the ranking response.
///
/// Carries every candidate field through plus the computed distance and
/// prediction; coordinates are echoed back for map display and stay null
/// for unlocated candidates.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub id: String,
    pub full_name: String,
    pub distance_km: f64,
    pub base_cost: f64,
    pub rating: f64,
    pub eta_predicted: f64,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
}

/// POST /api/v1/rank response body.
#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub results: Vec<RankedResult>,
}

impl RankResponse {
    /// The documented degraded shape for any internal failure.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

// ============ Pricing endpoints ============

/// POST /api/v1/price/{model,heuristic} request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRequest {
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
    #[serde(rename = "Base_Charge")]
    pub base_charge: f64,
    #[serde(rename = "Spare_Part_Price", default)]
    pub spare_part_price: f64,
}

/// Pricing endpoint response: either a quote or a structured error, both
/// delivered with HTTP 200 per the billing frontend contract.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PriceResponse {
    Quote(PriceQuoteBody),
    Error { status: String, message: String },
}

impl PriceResponse {
    pub fn error(message: impl Into<String>) -> Self {
        PriceResponse::Error {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Wire body of a successful price quote.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuoteBody {
    pub status: String,
    #[serde(rename = "Distance_KM")]
    pub distance_km: f64,
    #[serde(rename = "ETA_Minutes")]
    pub eta_minutes: f64,
    #[serde(rename = "Handling_Surge")]
    pub handling_surge: f64,
    #[serde(rename = "Base_Charge")]
    pub base_charge: f64,
    #[serde(rename = "Spare_Part_Price")]
    pub spare_part_price: f64,
    #[serde(rename = "Final_Price")]
    pub final_price: f64,
}

impl From<&PriceQuote> for PriceQuoteBody {
    fn from(quote: &PriceQuote) -> Self {
        Self {
            status: "success".to_string(),
            distance_km: quote.distance_km,
            eta_minutes: quote.eta_minutes,
            handling_surge: quote.handling_surge,
            base_charge: quote.base_charge,
            spare_part_price: quote.spare_part_price,
            final_price: quote.final_price,
        }
    }
}
