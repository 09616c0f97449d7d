use std::path::Path;

use curator_core::{CuratorError, CuratorResult};
use feature_engine::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use serde::Deserialize;

/// On-disk form of the frozen scaler: a language-neutral JSON dump of the
/// fitted StandardScaler (feature names in training order, per-feature mean
/// and scale).
#[derive(Debug, Deserialize)]
pub struct ScalerArtifact {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Frozen feature scaler. Loaded once, read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn load(path: &Path) -> CuratorResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let artifact: ScalerArtifact = serde_json::from_str(&raw)?;
        Self::from_artifact(artifact)
    }

    /// Validates the artifact against the 47-key schema. Any disagreement
    /// in key count, name or order is a programming error between the
    /// training pipeline and this code: fail fast, never reorder silently.
    pub fn from_artifact(artifact: ScalerArtifact) -> CuratorResult<Self> {
        if artifact.feature_names.len() != FEATURE_COUNT
            || artifact.mean.len() != FEATURE_COUNT
            || artifact.scale.len() != FEATURE_COUNT
        {
            return Err(CuratorError::ShapeMismatch {
                expected: format!("{FEATURE_COUNT} features"),
                actual: format!(
                    "{} names, {} means, {} scales",
                    artifact.feature_names.len(),
                    artifact.mean.len(),
                    artifact.scale.len()
                ),
            });
        }
        for (i, name) in artifact.feature_names.iter().enumerate() {
            if name != FEATURE_NAMES[i] {
                return Err(CuratorError::ShapeMismatch {
                    expected: format!("{} at position {i}", FEATURE_NAMES[i]),
                    actual: name.clone(),
                });
            }
        }

        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [0.0; FEATURE_COUNT];
        mean.copy_from_slice(&artifact.mean);
        scale.copy_from_slice(&artifact.scale);
        Ok(Self { mean, scale })
    }

    /// No-op scaler (zero mean, unit scale).
    pub fn identity() -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    /// Standard-scales a feature vector into model input order. A zero
    /// scale (constant training feature) maps to 0.0 by guard.
    pub fn transform(&self, vector: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, value) in vector.values().iter().enumerate() {
            out[i] = if self.scale[i] != 0.0 {
                (value - self.mean[i]) / self.scale[i]
            } else {
                0.0
            };
        }
        out
    }
}
