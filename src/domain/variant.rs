use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::features::{finite_f64, FieldSpec};
use super::labels::{LabelTable, PERSONALITY_LABELS};

/// Personality questionnaire, in the order the classifier was trained on.
const CLASSIFICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("val1", "Time spent alone", finite_f64),
    FieldSpec::new("val2", "Stage fear", finite_f64),
    FieldSpec::new("val3", "Social event attendance", finite_f64),
    FieldSpec::new("val4", "Going outside", finite_f64),
    FieldSpec::new("val5", "Drained after socializing", finite_f64),
    FieldSpec::new("val6", "Friends circle size", finite_f64),
    FieldSpec::new("val7", "Post frequency", finite_f64),
];

/// Housing block features, in the order the regressor was trained on.
const REGRESSION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("val1", "Median income", finite_f64),
    FieldSpec::new("val2", "House age", finite_f64),
    FieldSpec::new("val3", "Average rooms", finite_f64),
    FieldSpec::new("val4", "Average bedrooms", finite_f64),
    FieldSpec::new("val5", "Population", finite_f64),
    FieldSpec::new("val6", "Average occupancy", finite_f64),
    FieldSpec::new("val7", "Latitude", finite_f64),
    FieldSpec::new("val8", "Longitude", finite_f64),
];

/// Which flavour of model the service fronts.
///
/// The variant fixes the field schema (arity and order) and how the raw
/// model output is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Discrete class index mapped through a label table
    Classification,
    /// Continuous value returned unchanged
    Regression,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classification => "classification",
            Variant::Regression => "regression",
        }
    }

    /// Ordered field schema for this variant.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Variant::Classification => CLASSIFICATION_FIELDS,
            Variant::Regression => REGRESSION_FIELDS,
        }
    }

    pub fn arity(&self) -> usize {
        self.fields().len()
    }

    /// Label table for class indices, `None` for regression.
    pub fn labels(&self) -> Option<&'static LabelTable> {
        match self {
            Variant::Classification => Some(&PERSONALITY_LABELS),
            Variant::Regression => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Variant::Classification => "Personality prediction",
            Variant::Regression => "House value prediction",
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Classification
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classification" | "classifier" => Ok(Variant::Classification),
            "regression" | "regressor" => Ok(Variant::Regression),
            other => Err(format!(
                "unknown variant '{other}', expected 'classification' or 'regression'"
            )),
        }
    }
}
