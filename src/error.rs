use thiserror::Error;

/// Main error type for startup, model loading and CLI paths
#[derive(Error, Debug)]
pub enum GateError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Artifact errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for GateError
pub type Result<T> = std::result::Result<T, GateError>;

/// Request-scoped failures of the inference cycle.
///
/// Every variant is caught at the request boundary and turned into a
/// user-facing message plus a log entry; none of them end the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("Model not loaded - check server logs")]
    ModelUnavailable,

    #[error("Invalid value for field '{name}': '{value}'")]
    InvalidField { name: String, value: String },

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    /// The model returned a class index the label table does not cover.
    #[error("Model returned unmapped class index {0}")]
    UnmappedPrediction(f64),
}

impl PredictError {
    /// Stable machine-readable kind, used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelUnavailable => "model_unavailable",
            Self::InvalidField { .. } => "invalid_field",
            Self::InferenceFailed(_) => "inference_failed",
            Self::UnmappedPrediction(_) => "internal",
        }
    }

    /// Text safe to show to the person who submitted the form.
    ///
    /// Internal failures get a generic message; the detail goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::ModelUnavailable | Self::InvalidField { .. } => self.to_string(),
            Self::InferenceFailed(_) => "Prediction failed - check server logs".to_string(),
            Self::UnmappedPrediction(_) => "Internal error - check server logs".to_string(),
        }
    }

    /// True for failures caused by the server rather than the submitted data.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InferenceFailed(_) | Self::UnmappedPrediction(_))
    }
}

impl From<PredictError> for GateError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::InvalidField { .. } => GateError::Validation(err.to_string()),
            other => GateError::Model(other.to_string()),
        }
    }
}
