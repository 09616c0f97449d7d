use std::time::Duration;

use async_trait::async_trait;
use curator_core::{CuratorError, CuratorResult};
use feature_engine::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

/// Backend-agnostic interface to the frozen classifier.
///
/// The contract is deliberately narrow: a scaled 47-value vector in
/// training order goes in, the positive-class (UP) probability comes out.
/// Any process that can score the serialized model can sit behind this.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> CuratorResult<f64>;

    fn backend_name(&self) -> &'static str;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    features: &'a [f64],
}

#[derive(Deserialize)]
struct PredictResponse {
    probability_up: f64,
}

/// HTTP implementation: posts the scaled vector to the model service
/// hosting the frozen XGBoost artifact.
#[derive(Clone)]
pub struct HttpModelBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpModelBackend {
    pub fn new(base_url: String, timeout: Duration) -> CuratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CuratorError::ModelService(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub async fn health(&self) -> CuratorResult<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| CuratorError::ModelService(e.to_string()))?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl ModelBackend for HttpModelBackend {
    async fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> CuratorResult<f64> {
        let request = PredictRequest {
            features: features.as_slice(),
        };
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| CuratorError::ModelService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CuratorError::ModelService(format!(
                "model service returned HTTP {}",
                response.status()
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| CuratorError::ModelService(e.to_string()))?;

        if !(0.0..=1.0).contains(&parsed.probability_up) {
            return Err(CuratorError::ModelService(format!(
                "probability out of range: {}",
                parsed.probability_up
            )));
        }
        Ok(parsed.probability_up)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
