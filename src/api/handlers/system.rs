use axum::{extract::State, http::StatusCode, Json};

use crate::api::{state::AppState, types::*};
use crate::services::HealthReport;

/// GET /health -- model presence report, always 200
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.service.health())
}

/// GET /healthz -- is the process alive?
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz -- can the service answer predictions?
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.service.model_loaded() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /api/schema
pub async fn get_schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    let variant = state.service.variant();
    Json(SchemaResponse {
        variant,
        fields: variant.fields(),
        labels: variant.labels().map(|table| {
            table
                .entries()
                .iter()
                .map(|&(index, label)| LabelEntry { index, label })
                .collect()
        }),
    })
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        variant: state.service.variant(),
        model_loaded: state.service.model_loaded(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
