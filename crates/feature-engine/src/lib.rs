pub mod engine;
pub mod indicators;
pub mod schema;
pub mod series;


pub use engine::{IndicatorEngine, WINDOW_SIZE};
pub use schema::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
