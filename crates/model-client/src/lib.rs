pub mod predictor;
pub mod provider;
pub mod scaler;

#[cfg(test)]
mod predictor_tests;

pub use predictor::DirectionalPredictor;
pub use provider::{HttpModelBackend, ModelBackend};
pub use scaler::{ScalerArtifact, StandardScaler};
