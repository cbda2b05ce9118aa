pub mod health;
pub mod predictor;

pub use health::{HealthReport, HealthStatus};
pub use predictor::PredictionService;
