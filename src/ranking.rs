//! Ranking engine: batch ETA prediction and deterministic ordering.

use crate::errors::AppError;
use crate::features::EtaFeatures;
use crate::models::{EtaQuery, RankedResult};
use crate::scoring::ScoringModel;

/// Ranks the query's candidates ascending by predicted ETA.
///
/// One vectorized model call covers the whole batch, so predictions stay
/// positionally aligned with input order. The sort is stable: equal ETAs
/// keep input order. Candidates without a known location carry the sentinel
/// distance and are ranked like any other, never dropped, so the output
/// always has one entry per input candidate.
pub fn rank_candidates(
    query: &EtaQuery,
    eta_model: Option<&ScoringModel>,
) -> Result<Vec<RankedResult>, AppError> {
    let model = eta_model
        .ok_or_else(|| AppError::ModelUnavailable("ETA model is not loaded".to_string()))?;

    let rows: Vec<EtaFeatures> = query
        .candidates
        .iter()
        .map(|c| EtaFeatures::for_candidate(query.user_location, &query.service_type, c))
        .collect();

    let predictions = model.predict_batch(&rows);

    let mut results: Vec<RankedResult> = query
        .candidates
        .iter()
        .zip(rows.iter().zip(predictions))
        .map(|(candidate, (row, eta_predicted))| RankedResult {
            id: candidate.id.clone(),
            full_name: candidate.full_name.clone(),
            distance_km: row.distance_km,
            base_cost: candidate.base_cost,
            rating: candidate.rating,
            eta_predicted,
            location_lat: candidate.location.map(|c| c.lat),
            location_lng: candidate.location.map(|c| c.lng),
        })
        .collect();

    // total_cmp keeps the ordering total even if a model ever emits NaN
    results.sort_by(|a, b| a.eta_predicted.total_cmp(&b.eta_predicted));

    Ok(results)
}
