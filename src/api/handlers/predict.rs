use axum::{extract::State, http::StatusCode, Json};
use std::collections::HashMap;
use tracing::{info_span, warn};
use uuid::Uuid;

use crate::api::{state::AppState, types::*};
use crate::error::PredictError;

fn error_status(err: &PredictError) -> StatusCode {
    match err {
        PredictError::InvalidField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PredictError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        PredictError::InferenceFailed(_) | PredictError::UnmappedPrediction(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// POST /api/predict
pub async fn predict_json(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> std::result::Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    let fields = req.into_raw_fields();
    let span = info_span!("api_predict", %request_id);

    match span.in_scope(|| state.service.predict_form(&fields)) {
        Ok(prediction) => Ok(Json(PredictResponse {
            request_id,
            variant: state.service.variant(),
            prediction: prediction.value,
            label: prediction.label.map(str::to_string),
        })),
        Err(err) => Err((
            error_status(&err),
            Json(ErrorResponse::from_predict_error(request_id, &err)),
        )),
    }
}

/// POST /prediction -- inert echo; never calls the model
pub async fn prediction_stub(
    State(state): State<AppState>,
    Json(body): Json<HashMap<String, serde_json::Value>>,
) -> Json<PredictionStubResponse> {
    let field = state
        .service
        .variant()
        .fields()
        .first()
        .map(|f| f.key)
        .unwrap_or_default()
        .to_string();
    warn!(%field, "Deprecated /prediction endpoint called");

    Json(PredictionStubResponse {
        value: body.get(&field).cloned(),
        field,
        prediction: None,
        note: "no inference is run here; use POST / or POST /api/predict".to_string(),
    })
}
