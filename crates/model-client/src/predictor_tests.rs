use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use curator_core::{CuratorError, CuratorResult, Direction};
use feature_engine::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

use crate::predictor::DirectionalPredictor;
use crate::provider::ModelBackend;
use crate::scaler::{ScalerArtifact, StandardScaler};

struct FixedBackend(f64);

#[async_trait]
impl ModelBackend for FixedBackend {
    async fn predict_proba(&self, _features: &[f64; FEATURE_COUNT]) -> CuratorResult<f64> {
        Ok(self.0)
    }

    fn backend_name(&self) -> &'static str {
        "fixed"
    }
}

/// Records what the backend received, to observe scaling.
struct CapturingBackend {
    seen: std::sync::Mutex<Vec<[f64; FEATURE_COUNT]>>,
}

#[async_trait]
impl ModelBackend for CapturingBackend {
    async fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> CuratorResult<f64> {
        self.seen.lock().unwrap().push(*features);
        Ok(0.6)
    }

    fn backend_name(&self) -> &'static str {
        "capturing"
    }
}

fn vector_of(value: f64) -> FeatureVector {
    FeatureVector::new([value; FEATURE_COUNT]).unwrap()
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn valid_artifact() -> ScalerArtifact {
    ScalerArtifact {
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        mean: vec![2.0; FEATURE_COUNT],
        scale: vec![4.0; FEATURE_COUNT],
    }
}

#[tokio::test]
async fn probabilities_are_complementary() {
    let predictor = DirectionalPredictor::new(StandardScaler::identity(), Arc::new(FixedBackend(0.72)));
    let prediction = predictor
        .predict("RELIANCE", as_of(), &vector_of(1.0), 2850.0)
        .await
        .unwrap();

    assert_eq!(prediction.direction, Direction::Up);
    assert!((prediction.probability_up - 0.72).abs() < 1e-12);
    assert!((prediction.probability_down - 0.28).abs() < 1e-12);
    assert_eq!(prediction.last_close, 2850.0);
}

#[tokio::test]
async fn tie_probability_goes_up() {
    let predictor = DirectionalPredictor::new(StandardScaler::identity(), Arc::new(FixedBackend(0.5)));
    let prediction = predictor
        .predict("TCS", as_of(), &vector_of(0.0), 4100.0)
        .await
        .unwrap();
    assert_eq!(prediction.direction, Direction::Up);

    let predictor = DirectionalPredictor::new(StandardScaler::identity(), Arc::new(FixedBackend(0.49)));
    let prediction = predictor
        .predict("TCS", as_of(), &vector_of(0.0), 4100.0)
        .await
        .unwrap();
    assert_eq!(prediction.direction, Direction::Down);
}

#[tokio::test]
async fn backend_receives_the_scaled_vector() {
    let backend = Arc::new(CapturingBackend {
        seen: std::sync::Mutex::new(vec![]),
    });
    let scaler = StandardScaler::from_artifact(valid_artifact()).unwrap();
    let predictor = DirectionalPredictor::new(scaler, backend.clone());

    predictor
        .predict("INFY", as_of(), &vector_of(10.0), 1500.0)
        .await
        .unwrap();

    let seen = backend.seen.lock().unwrap();
    // (10 - 2) / 4 = 2 for every position
    for value in seen[0] {
        assert!((value - 2.0).abs() < 1e-12);
    }
}

#[test]
fn scaler_rejects_wrong_feature_order() {
    let mut artifact = valid_artifact();
    artifact.feature_names.swap(0, 3);

    let err = StandardScaler::from_artifact(artifact).unwrap_err();
    assert!(matches!(err, CuratorError::ShapeMismatch { .. }));
}

#[test]
fn scaler_rejects_wrong_feature_count() {
    let mut artifact = valid_artifact();
    artifact.feature_names.pop();
    artifact.mean.pop();
    artifact.scale.pop();

    let err = StandardScaler::from_artifact(artifact).unwrap_err();
    assert!(matches!(err, CuratorError::ShapeMismatch { .. }));
}

#[test]
fn zero_scale_is_guarded() {
    let mut artifact = valid_artifact();
    artifact.scale[5] = 0.0;
    let scaler = StandardScaler::from_artifact(artifact).unwrap();

    let scaled = scaler.transform(&vector_of(10.0));
    assert_eq!(scaled[5], 0.0);
    assert!((scaled[0] - 2.0).abs() < 1e-12);
}
