//! textclf Server
//!
//! Loads the configured BERT or DistilBERT classifier once and serves
//! predictions over HTTP until SIGINT/SIGTERM.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{info, warn};

use textclf_server::cli::Cli;
use textclf_server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting textclf server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Model directory: {}", config.model.model_dir.display());
    info!("Device: {}", config.model.inference.device);
    info!("Max length: {}", config.model.inference.max_length);

    let addr = config.socket_addr()?;

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Model loading maps weights and may download a tokenizer
    let state = tokio::task::spawn_blocking(move || AppState::load(config)).await??;
    let state = state.with_metrics(metrics_handle);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("textclf_server=debug,textclf_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("textclf_server=info,textclf_classifiers=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "textclf_requests_total",
        "Total number of prediction requests"
    );
    metrics::describe_counter!(
        "textclf_errors_total",
        "Total number of failed prediction requests by kind"
    );
    metrics::describe_histogram!(
        "textclf_inference_latency_us",
        metrics::Unit::Microseconds,
        "Tokenization plus forward pass latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
