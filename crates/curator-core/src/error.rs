use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuratorError {
    /// Upstream collaborator could not supply data for a symbol. Transient;
    /// the symbol is skipped for the run, not the whole pipeline.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Feature/artifact shape disagreement. A programming error, not a
    /// runtime condition: fail fast rather than guess a mapping.
    #[error("Feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Model service error: {0}")]
    ModelService(String),

    #[error("Store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CuratorResult<T> = Result<T, CuratorError>;
