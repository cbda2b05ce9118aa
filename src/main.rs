mod main_runtime;

use anyhow::Context;
use clap::Parser;
use modelgate::api::{start_api_server, AppState};
use modelgate::cli::{self, Cli, Commands};
use modelgate::config::AppConfig;
use modelgate::ml::ModelHandle;
use modelgate::services::PredictionService;
use tracing::info;

use main_runtime::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command.unwrap_or_else(|| Commands::Serve(Default::default())) {
        Commands::Serve(args) => {
            args.apply(&mut config);
            init_logging(&config.logging);
            run_server(config).await?;
        }
        Commands::Check(args) => {
            init_logging_simple();
            args.apply(&mut config);
            cli::check_model(&config).context("model check failed")?;
        }
        Commands::Predict { model, values } => {
            init_logging_simple();
            model.apply(&mut config);
            cli::predict_once(&config, &values).context("prediction failed")?;
        }
    }

    Ok(())
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let variant = config.model.variant;
    let model_path = config.model.resolved_path();
    info!(
        path = %model_path.display(),
        %variant,
        "Starting modelgate v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Loaded once; a failure leaves the handle absent but the server still runs.
    let handle = ModelHandle::load(&model_path, variant);
    let state = AppState::new(PredictionService::new(handle, variant));

    start_api_server(state, &config.server.host, config.server.port)
        .await
        .context("API server failed")?;
    Ok(())
}
