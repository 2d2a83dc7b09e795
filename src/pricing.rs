//! Pricing engine: distance, ETA, and handling surge combined into a final
//! job price.
//!
//! One engine, two named surge strategies. The historical service grew two
//! divergent implementations of the same route; here the policy is an
//! explicit parameter so the two cannot drift apart silently.

use crate::errors::AppError;
use crate::features::{EtaFeatures, PriceFeatures};
use crate::geo::{self, Coordinate};
use crate::models::PriceRequest;
use crate::scoring::ScoringModel;

/// Assumed average travel speed for the heuristic ETA, in km/h.
pub const AVG_SPEED_KMH: f64 = 30.0;

/// Fraction of the predicted ETA (in minutes) charged as surge under the
/// heuristic policy.
pub const SURGE_PER_ETA_MINUTE: f64 = 0.5;

/// How the handling surge is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingPolicy {
    /// The price model predicts the surge directly from the trip features.
    ModelSurge,
    /// The ETA model predicts a completion time and the surge is a fixed
    /// fraction of it.
    HeuristicSurge,
}

/// A validated pricing job: one assigned provider plus the job economics.
#[derive(Debug, Clone)]
pub struct PricingJob {
    pub service_name: String,
    pub user_location: Coordinate,
    pub tech_location: Coordinate,
    pub base_charge: f64,
    pub spare_part_price: f64,
}

impl TryFrom<&PriceRequest> for PricingJob {
    type Error = AppError;

    fn try_from(req: &PriceRequest) -> Result<Self, AppError> {
        Ok(Self {
            service_name: req.service_name.clone(),
            user_location: Coordinate::new(req.user_lat, req.user_lng)?,
            tech_location: Coordinate::new(req.tech_lat, req.tech_lng)?,
            base_charge: req.base_charge,
            spare_part_price: req.spare_part_price,
        })
    }
}

/// A priced job. Distance, ETA, surge, and final price are rounded to two
/// decimals for the response; everything upstream of this struct runs at
/// full floating-point precision.
#[derive(Debug, Clone)]
pub struct PriceQuote {
    pub service_name: String,
    pub user_location: Coordinate,
    pub tech_location: Coordinate,
    pub distance_km: f64,
    pub eta_minutes: f64,
    pub handling_surge: f64,
    pub base_charge: f64,
    pub spare_part_price: f64,
    pub final_price: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prices a job under the requested surge policy.
///
/// Both policies share the distance and the average-speed ETA heuristic
/// (`distance / 30 km/h`, in minutes); they differ only in where the surge
/// number comes from. The final price is computed over the rounded surge so
/// the response always satisfies
/// `Final_Price == round(Base_Charge + Spare_Part_Price + Handling_Surge, 2)`
/// exactly.
pub fn quote_price(
    job: &PricingJob,
    policy: PricingPolicy,
    eta_model: Option<&ScoringModel>,
    price_model: Option<&ScoringModel>,
) -> Result<PriceQuote, AppError> {
    let distance_km = geo::haversine_km(job.user_location, job.tech_location);
    let heuristic_eta = distance_km / AVG_SPEED_KMH * 60.0;

    let (eta_minutes, raw_surge) = match policy {
        PricingPolicy::ModelSurge => {
            let model = price_model.ok_or_else(|| {
                AppError::ModelUnavailable("price model is not loaded".to_string())
            })?;
            let row = PriceFeatures::for_billing(
                &job.service_name,
                job.user_location,
                job.tech_location,
                distance_km,
                heuristic_eta,
            );
            let surge = single_prediction(model, &row)?;
            (heuristic_eta, surge)
        }
        PricingPolicy::HeuristicSurge => {
            let model = eta_model.ok_or_else(|| {
                AppError::ModelUnavailable("ETA model is not loaded".to_string())
            })?;
            let row = EtaFeatures::for_billing(distance_km, job.base_charge, &job.service_name);
            let eta = single_prediction(model, &row)?;
            // Surge derives from the ETA as published in the response, so
            // the two response fields stay arithmetically consistent.
            (eta, round2(eta) * SURGE_PER_ETA_MINUTE)
        }
    };

    let handling_surge = round2(raw_surge);
    let final_price = round2(job.base_charge + job.spare_part_price + handling_surge);

    Ok(PriceQuote {
        service_name: job.service_name.clone(),
        user_location: job.user_location,
        tech_location: job.tech_location,
        distance_km: round2(distance_km),
        eta_minutes: round2(eta_minutes),
        handling_surge,
        base_charge: job.base_charge,
        spare_part_price: job.spare_part_price,
        final_price,
    })
}

fn single_prediction<F: crate::scoring::FeatureVector>(
    model: &ScoringModel,
    row: &F,
) -> Result<f64, AppError> {
    model
        .predict_batch(std::slice::from_ref(row))
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("model returned no prediction".to_string()))
}
