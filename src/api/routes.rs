use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // HTML form
        .route("/", get(handlers::index).post(handlers::submit_form))
        // JSON inference
        .route("/api/predict", post(handlers::predict_json))
        .route("/api/schema", get(handlers::get_schema))
        .route("/api/status", get(handlers::get_status))
        // Inert echo kept for old clients
        .route("/prediction", post(handlers::prediction_stub))
        // Probes
        .route("/health", get(handlers::health_handler))
        .route("/healthz", get(handlers::liveness_handler))
        .route("/readyz", get(handlers::readiness_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
