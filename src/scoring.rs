//! Scoring model artifacts and the prediction interface.
//!
//! The ETA and surge models are trained offline and exported as JSON linear
//! scorers. Each artifact is loaded once at startup and shared immutably
//! across requests; a missing or corrupt file leaves that capability
//! unavailable instead of aborting the process, and the endpoints that need
//! it degrade per their documented contract.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

/// Reserved categorical level carrying the weight for values not seen
/// during training.
pub const OTHER_CATEGORY: &str = "__other__";

/// Input contract between feature rows and a scoring model.
///
/// Implemented by the typed schema structs in [`crate::features`]; the model
/// itself never sees a dynamic field map built at the boundary.
pub trait FeatureVector {
    /// Numeric fields as (name, value) pairs.
    fn numeric_fields(&self) -> Vec<(&'static str, f64)>;
    /// Categorical fields as (name, value) pairs.
    fn categorical_fields(&self) -> Vec<(&'static str, &str)>;
}

/// A linear scoring model as exported by the training pipeline.
///
/// Prediction is `intercept + Σ numeric weight·value + Σ categorical level
/// weight`. Unknown categorical levels fall back to the [`OTHER_CATEGORY`]
/// row; fields the model was not trained on contribute nothing. No bounds or
/// monotonicity are assumed of the output.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringModel {
    /// Artifact name, for logs only.
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: HashMap<String, f64>,
    #[serde(default)]
    pub categorical: HashMap<String, HashMap<String, f64>>,
}

impl ScoringModel {
    fn predict_one(&self, row: &impl FeatureVector) -> f64 {
        let mut score = self.intercept;
        for (name, value) in row.numeric_fields() {
            if let Some(weight) = self.numeric.get(name) {
                score += weight * value;
            }
        }
        for (name, level) in row.categorical_fields() {
            if let Some(levels) = self.categorical.get(name) {
                score += levels
                    .get(level)
                    .or_else(|| levels.get(OTHER_CATEGORY))
                    .copied()
                    .unwrap_or(0.0);
            }
        }
        score
    }

    /// Vectorized prediction: one scalar per row, positionally aligned with
    /// the input. Callers batch a whole request into a single call.
    pub fn predict_batch<F: FeatureVector>(&self, rows: &[F]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Loads a model artifact, tolerating absence.
///
/// Returns `None` and logs when the file is missing or malformed; callers
/// treat `None` as "capability unavailable" rather than a startup failure.
pub fn load_model(path: &Path) -> Option<Arc<ScoringModel>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Failed to read model artifact {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<ScoringModel>(&raw) {
        Ok(model) => {
            tracing::info!("Loaded model '{}' from {}", model.name, path.display());
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::error!("Failed to parse model artifact {}: {}", path.display(), e);
            None
        }
    }
}
