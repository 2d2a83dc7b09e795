use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::*;
use crate::pricing::{self, PricingJob, PricingPolicy};
use crate::ranking;
use crate::scoring::ScoringModel;
use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// ETA scoring model; `None` when the artifact failed to load at startup.
    pub eta_model: Option<Arc<ScoringModel>>,
    /// Price/surge scoring model; `None` when the artifact failed to load at startup.
    pub price_model: Option<Arc<ScoringModel>>,
}

/// API routes, state not yet applied. `main` merges these under its
/// middleware layers; endpoint tests mount them directly.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/rank", post(rank_servicemen))
        .route("/api/v1/price/model", post(price_model_surge))
        .route("/api/v1/price/heuristic", post(price_heuristic_surge))
}

/// Health check endpoint.
///
/// Returns the service status, version, and model availability.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-dispatch-api",
            "version": "0.1.0",
            "eta_model_loaded": state.eta_model.is_some(),
            "price_model_loaded": state.price_model.is_some(),
        })),
    )
}

/// POST /api/v1/rank
///
/// Ranks candidate servicemen ascending by predicted ETA from the customer's
/// location. When the ETA model is unavailable or the pipeline fails
/// internally the endpoint degrades to `{"results": []}` rather than
/// erroring; only malformed input is reported as a client error.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - JSON body with the customer location and candidate list.
///
/// # Returns
///
/// * `Result<Json<RankResponse>, AppError>` - The ranked candidates, or the
///   empty degraded shape.
pub async fn rank_servicemen(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    tracing::info!(
        "POST /rank - {} candidates, service_type: {:?}",
        req.servicemen.len(),
        req.service_type
    );

    let query = EtaQuery::try_from(&req).context("invalid ranking request")?;

    match ranking::rank_candidates(&query, state.eta_model.as_deref()) {
        Ok(results) => {
            tracing::info!("Ranked {} candidates", results.len());
            Ok(Json(RankResponse { results }))
        }
        Err(e) => {
            tracing::error!("Ranking failed, degrading to empty result set: {}", e);
            Ok(Json(RankResponse::empty()))
        }
    }
}

/// POST /api/v1/price/model
///
/// Prices a job with the handling surge predicted by the price model.
pub async fn price_model_surge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PriceRequest>,
) -> Result<Json<PriceResponse>, AppError> {
    price_with_policy(&state, req, PricingPolicy::ModelSurge)
}

/// POST /api/v1/price/heuristic
///
/// Prices a job with the handling surge derived from the predicted ETA.
pub async fn price_heuristic_surge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PriceRequest>,
) -> Result<Json<PriceResponse>, AppError> {
    price_with_policy(&state, req, PricingPolicy::HeuristicSurge)
}

/// Shared pricing boundary.
///
/// Validation problems surface as a client error; anything past validation
/// (unavailable model, pipeline failure) is converted into the structured
/// `{"status": "error"}` body the billing frontend expects, with the detail
/// kept in the server log.
fn price_with_policy(
    state: &AppState,
    req: PriceRequest,
    policy: PricingPolicy,
) -> Result<Json<PriceResponse>, AppError> {
    tracing::info!(
        "POST /price ({:?}) - service: {}, base charge: {}",
        policy,
        req.service_name,
        req.base_charge
    );

    let job = PricingJob::try_from(&req).context("invalid pricing request")?;

    match pricing::quote_price(
        &job,
        policy,
        state.eta_model.as_deref(),
        state.price_model.as_deref(),
    ) {
        Ok(quote) => {
            tracing::info!(
                "Priced job '{}': distance {} km, final price {}",
                quote.service_name,
                quote.distance_km,
                quote.final_price
            );
            Ok(Json(PriceResponse::Quote(PriceQuoteBody::from(&quote))))
        }
        Err(e) => {
            tracing::error!("Pricing failed under {:?}: {}", policy, e);
            Ok(Json(PriceResponse::error(e.to_string())))
        }
    }
}
