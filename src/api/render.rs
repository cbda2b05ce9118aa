//! Server-side HTML for the form page.

use std::collections::HashMap;
use std::fmt::Write;

use crate::domain::{Prediction, Variant};

/// Everything the form page can show.
#[derive(Debug, Default)]
pub struct FormView<'a> {
    /// Previously submitted raw values, echoed back into the inputs
    pub values: Option<&'a HashMap<String, String>>,
    pub prediction: Option<&'a Prediction>,
    pub error: Option<String>,
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_page(variant: Variant, view: &FormView<'_>) -> String {
    let title = escape_html(variant.title());
    let mut html = String::with_capacity(2048);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <form method=\"post\" action=\"/\">\n"
    );

    for field in variant.fields() {
        let value = view
            .values
            .and_then(|v| v.get(field.key))
            .map(|v| escape_html(v))
            .unwrap_or_default();
        let _ = write!(
            html,
            "<label for=\"{key}\">{label}</label>\n\
             <input type=\"text\" id=\"{key}\" name=\"{key}\" value=\"{value}\" required>\n<br>\n",
            key = field.key,
            label = escape_html(field.label),
        );
    }
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(prediction) = view.prediction {
        let _ = write!(
            html,
            "<div class=\"result\">Prediction: <strong>{}</strong></div>\n",
            escape_html(&prediction.to_string())
        );
    }
    if let Some(error) = &view.error {
        let _ = write!(html, "<div class=\"error\">{}</div>\n", escape_html(error));
    }

    html.push_str("</body>\n</html>\n");
    html
}
