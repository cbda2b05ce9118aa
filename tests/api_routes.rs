use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use modelgate::{
    api::{create_router, AppState},
    ml::{ModelArtifact, ModelHandle},
    Model, PredictionService, Result, Variant,
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

/// Returns a fixed output and records every vector it is given.
struct FixedModel {
    output: f64,
    dim: usize,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<f64>>>,
}

impl FixedModel {
    fn new(output: f64, dim: usize) -> Arc<Self> {
        Arc::new(Self {
            output,
            dim,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl Model for FixedModel {
    fn kind(&self) -> &'static str {
        "fixed"
    }

    fn input_dim(&self) -> usize {
        self.dim
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(features.to_vec());
        Ok(self.output)
    }
}

fn app_with(model: Option<Arc<FixedModel>>, variant: Variant) -> Router {
    let handle = match model {
        Some(m) => ModelHandle::new(m),
        None => ModelHandle::absent(),
    };
    create_router(AppState::new(PredictionService::new(handle, variant)))
}

fn form_body(n: usize) -> String {
    (1..=n)
        .map(|i| format!("val{i}={i}"))
        .collect::<Vec<_>>()
        .join("&")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let request = builder
        .body(Body::from(body))
        .expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, String::from_utf8_lossy(&bytes).to_string())
}

async fn post_form(app: &Router, body: String) -> (StatusCode, String) {
    send(
        app,
        Method::POST,
        "/",
        Some("application/x-www-form-urlencoded"),
        body,
    )
    .await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, text) = send(
        app,
        Method::POST,
        uri,
        Some("application/json"),
        body.to_string(),
    )
    .await;
    let value = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn get_index_renders_empty_form() {
    let app = app_with(Some(FixedModel::new(0.0, 7)), Variant::Classification);
    let (status, html) = send(&app, Method::GET, "/", None, String::new()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("name=\"val7\""));
    assert!(!html.contains("class=\"result\""));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn classification_zero_renders_introvertido() {
    let model = FixedModel::new(0.0, 7);
    let app = app_with(Some(model.clone()), Variant::Classification);

    let (status, html) = post_form(&app, form_body(7)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<strong>Introvertido</strong>"));
    assert!(!html.contains("class=\"error\""));

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]]);
}

#[tokio::test]
async fn classification_one_renders_extrovertido() {
    let app = app_with(Some(FixedModel::new(1.0, 7)), Variant::Classification);
    let (status, html) = post_form(&app, form_body(7)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<strong>Extrovertido</strong>"));
}

#[tokio::test]
async fn invalid_field_is_named_and_model_not_called() {
    let model = FixedModel::new(0.0, 7);
    let app = app_with(Some(model.clone()), Variant::Classification);

    let body = "val1=1&val2=2&val3=lots&val4=4&val5=nope&val6=6&val7=7".to_string();
    let (status, html) = post_form(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("&#39;val3&#39;: &#39;lots&#39;"));
    assert!(!html.contains("nope&#39;"), "only the first invalid field is reported");
    assert!(!html.contains("class=\"result\""));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_field_is_invalid() {
    let model = FixedModel::new(0.0, 7);
    let app = app_with(Some(model.clone()), Variant::Classification);

    let (_, html) = post_form(&app, form_body(6)).await;
    assert!(html.contains("Invalid value for field &#39;val7&#39;"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn regression_without_model_reports_not_loaded() {
    let app = app_with(None, Variant::Regression);
    let (status, html) = post_form(&app, form_body(8)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Model not loaded - check server logs"));
    assert!(!html.contains("class=\"result\""));
}

#[tokio::test]
async fn unmapped_class_is_internal_error() {
    let app = app_with(Some(FixedModel::new(5.0, 7)), Variant::Classification);
    let (status, html) = post_form(&app, form_body(7)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(html.contains("Internal error"));
    assert!(!html.contains("Introvertido"));
    assert!(!html.contains("Extrovertido"));
}

#[tokio::test]
async fn health_reflects_model_presence() {
    let up = app_with(Some(FixedModel::new(0.0, 7)), Variant::Classification);
    let (status, body) = send(&up, Method::GET, "/health", None, String::new()).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"status": "healthy", "model_loaded": true}));

    // Health does not depend on what was submitted before.
    let _ = post_form(&up, "val1=bad".to_string()).await;
    let (_, body) = send(&up, Method::GET, "/health", None, String::new()).await;
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "healthy");

    let down = app_with(None, Variant::Regression);
    let (status, body) = send(&down, Method::GET, "/health", None, String::new()).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"status": "unhealthy", "model_loaded": false}));
}

#[tokio::test]
async fn readiness_probe_follows_model() {
    let up = app_with(Some(FixedModel::new(0.0, 8)), Variant::Regression);
    let down = app_with(None, Variant::Regression);

    let (status, _) = send(&up, Method::GET, "/readyz", None, String::new()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&down, Method::GET, "/readyz", None, String::new()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (status, _) = send(&down, Method::GET, "/healthz", None, String::new()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn json_predict_returns_raw_regression_value() {
    let model = FixedModel::new(3.75, 8);
    let app = app_with(Some(model.clone()), Variant::Regression);

    let fields: serde_json::Map<String, Value> = (1..=8)
        .map(|i| (format!("val{i}"), json!(i as f64 / 2.0)))
        .collect();
    let (status, body) = post_json(&app, "/api/predict", json!({ "fields": fields })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 3.75);
    assert_eq!(body["label"], Value::Null);
    assert_eq!(body["variant"], "regression");
    assert_eq!(
        model.seen.lock().unwrap()[0],
        vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0]
    );
}

#[tokio::test]
async fn json_predict_error_statuses() {
    let app = app_with(Some(FixedModel::new(1.0, 7)), Variant::Classification);
    let (status, body) = post_json(
        &app,
        "/api/predict",
        json!({"fields": {"val1": 1, "val2": "two"}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_field");
    assert_eq!(body["field"], "val2");
    assert_eq!(body["value"], "two");

    let down = app_with(None, Variant::Classification);
    let (status, body) = post_json(&down, "/api/predict", json!({"fields": {}})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "model_unavailable");
    assert_eq!(body["message"], "Model not loaded - check server logs");
}

#[tokio::test]
async fn json_predict_reports_non_scalar_field_values() {
    let model = FixedModel::new(1.0, 7);
    let app = app_with(Some(model.clone()), Variant::Classification);

    let (status, body) = post_json(&app, "/api/predict", json!({"fields": {"val1": true}})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_field");
    assert_eq!(body["field"], "val1");
    assert_eq!(body["value"], "true");
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn json_predict_rejects_non_finite_output() {
    let app = app_with(Some(FixedModel::new(f64::INFINITY, 8)), Variant::Regression);
    let fields: serde_json::Map<String, Value> =
        (1..=8).map(|i| (format!("val{i}"), json!(i))).collect();

    let (status, body) = post_json(&app, "/api/predict", json!({ "fields": fields })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "inference_failed");
    assert!(body.get("prediction").is_none());
}

#[tokio::test]
async fn prediction_stub_echoes_without_inference() {
    let model = FixedModel::new(1.0, 7);
    let app = app_with(Some(model.clone()), Variant::Classification);

    let (status, body) = post_json(&app, "/prediction", json!({"val1": "42"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["field"], "val1");
    assert_eq!(body["value"], "42");
    assert_eq!(body["prediction"], Value::Null);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn schema_lists_fields_in_order() {
    let app = app_with(None, Variant::Classification);
    let (status, body) = send(&app, Method::GET, "/api/schema", None, String::new()).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&body).unwrap();
    let keys: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["val1", "val2", "val3", "val4", "val5", "val6", "val7"]);
    assert_eq!(body["labels"][1]["label"], "Extrovertido");
}

#[tokio::test]
async fn status_reports_variant_and_version() {
    let app = app_with(None, Variant::Regression);
    let (status, body) = send(&app, Method::GET, "/api/status", None, String::new()).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["variant"], "regression");
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn end_to_end_with_forest_artifact() {
    // One stump on "time spent alone": more than 5 hours alone -> class 0.
    let artifact = json!({
        "type": "random_forest",
        "n_features": 7,
        "task": {"kind": "classifier", "classes": [0, 1]},
        "trees": [{"nodes": [
            {"feature": 0, "threshold": 5.0, "left": 1, "right": 2},
            {"value": [1.0, 9.0]},
            {"value": [8.0, 2.0]}
        ]}]
    });
    let path = std::env::temp_dir().join(format!("modelgate-it-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, artifact.to_string()).unwrap();
    let handle = ModelHandle::load(&path, Variant::Classification);
    std::fs::remove_file(&path).ok();
    assert!(handle.is_loaded());

    let app = create_router(AppState::new(PredictionService::new(
        handle,
        Variant::Classification,
    )));

    let introvert = "val1=9&val2=0&val3=1&val4=1&val5=1&val6=2&val7=0";
    let (_, html) = post_form(&app, introvert.to_string()).await;
    assert!(html.contains("<strong>Introvertido</strong>"));

    let extrovert = "val1=1&val2=0&val3=8&val4=6&val5=0&val6=14&val7=9";
    let (_, html) = post_form(&app, extrovert.to_string()).await;
    assert!(html.contains("<strong>Extrovertido</strong>"));

    // The artifact type is a plain JSON document.
    assert!(ModelArtifact::from_json(&artifact.to_string()).is_ok());
}
