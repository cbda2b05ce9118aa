use serde::Serialize;
use std::fmt;

use crate::error::PredictError;

/// Class labels for the personality classifier.
pub static PERSONALITY_LABELS: LabelTable =
    LabelTable::new(&[(0, "Introvertido"), (1, "Extrovertido")]);

/// Fixed lookup from class index to display label.
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    entries: &'static [(u32, &'static str)],
}

impl LabelTable {
    pub const fn new(entries: &'static [(u32, &'static str)]) -> Self {
        Self { entries }
    }

    /// Map a raw model output to its label.
    ///
    /// The output must be a finite, integral, non-negative value present in
    /// the table; anything else is `UnmappedPrediction`.
    pub fn label_for(&self, raw: f64) -> Result<&'static str, PredictError> {
        if !raw.is_finite() || raw < 0.0 || raw.fract() != 0.0 || raw > u32::MAX as f64 {
            return Err(PredictError::UnmappedPrediction(raw));
        }
        let index = raw as u32;
        self.entries
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, label)| *label)
            .ok_or(PredictError::UnmappedPrediction(raw))
    }

    pub fn entries(&self) -> &'static [(u32, &'static str)] {
        self.entries
    }
}

/// Result of a successful inference cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Raw model output
    pub value: f64,
    /// Mapped label, classification only
    pub label: Option<&'static str>,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "{label}"),
            None => write!(f, "{}", self.value),
        }
    }
}
