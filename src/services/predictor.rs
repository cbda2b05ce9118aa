//! The validated inference cycle.
//!
//! model check -> field extraction -> coercion -> vector assembly ->
//! inference -> output mapping. Every step is fail-fast and every failure is
//! logged before it is returned to the caller.

use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

use super::health::HealthReport;
use crate::domain::{FeatureVector, Prediction, Variant};
use crate::error::PredictError;
use crate::ml::ModelHandle;

/// Request handler core: owns the shared Model Handle and the variant.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: ModelHandle,
    variant: Variant,
}

impl PredictionService {
    pub fn new(model: ModelHandle, variant: Variant) -> Self {
        Self { model, variant }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    pub fn health(&self) -> HealthReport {
        HealthReport::from_model_loaded(self.model_loaded())
    }

    /// Run one inference, reading raw field values through `lookup`.
    #[instrument(skip_all, fields(variant = %self.variant))]
    pub fn predict<'a, F>(&self, lookup: F) -> Result<Prediction, PredictError>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let Some(model) = self.model.get() else {
            error!("Prediction requested but no model is loaded");
            return Err(PredictError::ModelUnavailable);
        };

        let features = FeatureVector::extract(self.variant, lookup).map_err(|e| {
            warn!(error = %e, "Rejected submission");
            e
        })?;

        let value = model.predict(features.values()).map_err(|e| {
            error!(error = %e, features = ?features.values(), "Inference failed");
            PredictError::InferenceFailed(e.to_string())
        })?;
        if !value.is_finite() {
            error!(
                raw = value,
                features = ?features.values(),
                "Model produced a non-finite output"
            );
            return Err(PredictError::InferenceFailed(format!(
                "model produced a non-finite output: {value}"
            )));
        }

        let label = match self.variant.labels() {
            Some(table) => Some(table.label_for(value).map_err(|e| {
                error!(raw = value, features = ?features.values(), "Model output has no label");
                e
            })?),
            None => None,
        };

        let prediction = Prediction { value, label };
        info!(result = %prediction, raw = value, "Prediction served");
        Ok(prediction)
    }

    /// Convenience wrapper for decoded form bodies.
    pub fn predict_form(&self, form: &HashMap<String, String>) -> Result<Prediction, PredictError> {
        self.predict(|key| form.get(key).map(String::as_str))
    }
}
