use std::sync::Arc;

use chrono::NaiveDate;
use curator_core::{CuratorResult, Direction, Prediction};
use feature_engine::FeatureVector;

use crate::provider::ModelBackend;
use crate::scaler::StandardScaler;

/// Directional Predictor: the frozen scaler plus classifier behind one
/// stateless call. Artifacts are loaded once and never mutated; every
/// `predict` is independent.
pub struct DirectionalPredictor {
    scaler: StandardScaler,
    backend: Arc<dyn ModelBackend>,
}

impl DirectionalPredictor {
    pub fn new(scaler: StandardScaler, backend: Arc<dyn ModelBackend>) -> Self {
        Self { scaler, backend }
    }

    /// Scales the vector, scores it, and classifies the direction.
    /// The tie probability 0.5 goes to UP.
    pub async fn predict(
        &self,
        symbol: &str,
        as_of_date: NaiveDate,
        vector: &FeatureVector,
        last_close: f64,
    ) -> CuratorResult<Prediction> {
        let scaled = self.scaler.transform(vector);
        let probability_up = self.backend.predict_proba(&scaled).await?;

        let direction = if probability_up >= 0.5 {
            Direction::Up
        } else {
            Direction::Down
        };
        tracing::debug!(
            symbol,
            backend = self.backend.backend_name(),
            probability_up,
            ?direction,
            "model prediction"
        );

        Ok(Prediction {
            symbol: symbol.to_string(),
            as_of_date,
            direction,
            probability_up,
            probability_down: 1.0 - probability_up,
            last_close,
        })
    }
}
