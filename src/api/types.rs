use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{FieldSpec, Variant};
use crate::error::PredictError;

// ============================================================================
// Prediction Types
// ============================================================================

/// JSON inference request. Field values are kept as raw JSON so that any
/// shape, not just numbers and strings, reaches field validation.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

/// Raw text as the coercion step sees it. Strings pass through unquoted;
/// every other JSON value becomes its JSON text.
fn raw_field_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

impl PredictRequest {
    pub fn into_raw_fields(self) -> HashMap<String, String> {
        self.fields
            .into_iter()
            .map(|(k, v)| (k, raw_field_text(v)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub request_id: Uuid,
    pub variant: Variant,
    pub prediction: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub request_id: Uuid,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ErrorResponse {
    pub fn from_predict_error(request_id: Uuid, err: &PredictError) -> Self {
        let (field, value) = match err {
            PredictError::InvalidField { name, value } => (Some(name.clone()), Some(value.clone())),
            _ => (None, None),
        };
        Self {
            request_id,
            error: err.kind().to_string(),
            message: err.user_message(),
            field,
            value,
        }
    }
}

/// Reply of the inert `/prediction` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionStubResponse {
    pub field: String,
    pub value: Option<serde_json::Value>,
    pub prediction: Option<f64>,
    pub note: String,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SchemaResponse {
    pub variant: Variant,
    pub fields: &'static [FieldSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelEntry>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelEntry {
    pub index: u32,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub variant: Variant,
    pub model_loaded: bool,
    pub uptime_seconds: i64,
    pub version: String,
}
