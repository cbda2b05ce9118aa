pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ml;
pub mod services;

pub use config::AppConfig;
pub use domain::{FeatureVector, Prediction, Variant};
pub use error::{GateError, PredictError, Result};
pub use ml::{Model, ModelArtifact, ModelHandle};
pub use services::{HealthReport, HealthStatus, PredictionService};
