use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::dense::DenseNetwork;
use super::forest::DecisionForest;
use crate::error::Result;

/// The single inference capability the service needs from a model.
///
/// Implementations are immutable once built and shared across requests.
#[cfg_attr(test, mockall::automock)]
pub trait Model: Send + Sync {
    /// Short artifact kind, for logs and the CLI
    fn kind(&self) -> &'static str;

    /// Number of features `predict` expects
    fn input_dim(&self) -> usize;

    /// Run inference on one feature vector. Classifiers return the class
    /// index, regressors the predicted value.
    fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// On-disk model artifact, tagged by `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(DecisionForest),
    Dense(DenseNetwork),
}

impl ModelArtifact {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RandomForest(forest) => forest.validate(),
            Self::Dense(net) => net.validate(),
        }
    }

    pub fn into_model(self) -> Arc<dyn Model> {
        match self {
            Self::RandomForest(forest) => Arc::new(forest),
            Self::Dense(net) => Arc::new(net),
        }
    }
}
