use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::services::PredictionService;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Inference cycle, holding the read-only Model Handle
    pub service: Arc<PredictionService>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service: Arc::new(service),
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
