//! Health report derived from Model Handle presence.

use serde::{Deserialize, Serialize};

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub model_loaded: bool,
}

impl HealthReport {
    pub fn from_model_loaded(model_loaded: bool) -> Self {
        Self {
            status: if model_loaded {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            model_loaded,
        }
    }
}
