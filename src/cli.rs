use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::domain::Variant;
use crate::error::{GateError, Result};
use crate::ml::{try_load, ModelHandle};
use crate::services::PredictionService;

#[derive(Parser)]
#[command(name = "modelgate")]
#[command(version)]
#[command(about = "Serve a pre-trained model behind an HTML form and a JSON API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml, {MODELGATE_ENV}.toml)
    #[arg(short, long, default_value = "config", global = true)]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the model and serve HTTP (default)
    Serve(ServeArgs),
    /// Load and validate a model artifact
    Check(ModelArgs),
    /// Run one prediction from the command line
    Predict {
        #[command(flatten)]
        model: ModelArgs,
        /// Field values in canonical order (val1, val2, ...)
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Model artifact path (overrides model.path)
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// classification or regression (overrides model.variant)
    #[arg(long)]
    pub variant: Option<Variant>,
}

impl ModelArgs {
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(path) = &self.model {
            cfg.model.path = path.clone();
        }
        if let Some(variant) = self.variant {
            cfg.model.variant = variant;
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,
    /// Interface to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,
    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub fn apply(&self, cfg: &mut AppConfig) {
        self.model.apply(cfg);
        if let Some(host) = &self.host {
            cfg.server.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
    }
}

/// Validate the configured artifact and print a one-line summary.
pub fn check_model(cfg: &AppConfig) -> Result<()> {
    let path = cfg.model.resolved_path();
    let model = try_load(&path, cfg.model.variant)?;
    println!(
        "OK {}: {} model, {} features, {} variant",
        path.display(),
        model.kind(),
        model.input_dim(),
        cfg.model.variant
    );
    Ok(())
}

/// Map positional values onto the variant's field keys.
pub fn values_to_fields(variant: Variant, values: &[String]) -> Result<HashMap<String, String>> {
    if values.len() > variant.arity() {
        return Err(GateError::Validation(format!(
            "expected at most {} values for the {} variant, got {}",
            variant.arity(),
            variant,
            values.len()
        )));
    }
    Ok(variant
        .fields()
        .iter()
        .zip(values)
        .map(|(field, value)| (field.key.to_string(), value.clone()))
        .collect())
}

/// Run a single prediction through the same validation path as the server.
pub fn predict_once(cfg: &AppConfig, values: &[String]) -> Result<()> {
    let variant = cfg.model.variant;
    let fields = values_to_fields(variant, values)?;
    let handle = ModelHandle::load(&cfg.model.resolved_path(), variant);
    let service = PredictionService::new(handle, variant);

    let prediction = service.predict_form(&fields)?;
    println!("{prediction}");
    Ok(())
}
