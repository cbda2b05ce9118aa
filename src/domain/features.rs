//! Field extraction and feature vector assembly.
//!
//! Fields are read in the variant's canonical order and the first failure
//! aborts the whole request; later fields are never looked at.

use serde::Serialize;
use std::fmt;

use super::variant::Variant;
use crate::error::PredictError;

/// One named input position of the feature vector.
#[derive(Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Form key the value is submitted under
    pub key: &'static str,
    /// Human-readable name shown next to the input
    pub label: &'static str,
    #[serde(skip)]
    parse: fn(&str) -> Option<f64>,
}

impl FieldSpec {
    pub const fn new(
        key: &'static str,
        label: &'static str,
        parse: fn(&str) -> Option<f64>,
    ) -> Self {
        Self { key, label, parse }
    }

    /// Coerce a raw submitted value. A missing field is treated as empty.
    pub fn coerce(&self, raw: Option<&str>) -> Result<f64, PredictError> {
        let raw = raw.unwrap_or("");
        (self.parse)(raw).ok_or_else(|| PredictError::InvalidField {
            name: self.key.to_string(),
            value: raw.to_string(),
        })
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish()
    }
}

/// Float coercion shared by every field: trims whitespace and rejects
/// NaN and infinities.
pub fn finite_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Ordered numeric input for a single inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Build a vector by looking each field up in canonical order.
    pub fn extract<'a, F>(variant: Variant, mut lookup: F) -> Result<Self, PredictError>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let fields = variant.fields();
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            values.push(field.coerce(lookup(field.key))?);
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}
