use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use std::collections::HashMap;
use tracing::info_span;
use uuid::Uuid;

use crate::api::{
    render::{render_page, FormView},
    state::AppState,
};

/// GET / -- empty form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(state.service.variant(), &FormView::default()))
}

/// POST / -- run the inference cycle and render the result or the error
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("form_submit", %request_id);
    let result = span.in_scope(|| state.service.predict_form(&form));

    let variant = state.service.variant();
    match result {
        Ok(prediction) => {
            let view = FormView {
                values: Some(&form),
                prediction: Some(&prediction),
                error: None,
            };
            Html(render_page(variant, &view)).into_response()
        }
        Err(err) => {
            let status = if err.is_internal() {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::OK
            };
            let view = FormView {
                values: Some(&form),
                prediction: None,
                error: Some(err.user_message()),
            };
            (status, Html(render_page(variant, &view))).into_response()
        }
    }
}
