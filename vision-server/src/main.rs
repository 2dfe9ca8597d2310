//! Vision AI server entry point.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;

use vision_ai_server::{app, logging, AppState, Config, DeepFaceClassifier, MessageLog};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("vision-ai-server {}", VERSION);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Check config.toml, PORT and VISION__SECTION__KEY environment variables.",
            e
        )
    })?;

    logging::init(&config.logging.level);
    tracing::info!("Starting vision-ai-server {}", VERSION);

    let classifier = Arc::new(DeepFaceClassifier::new(
        &config.classifier.base_url,
        &config.classifier.detector_backend,
    ));
    tracing::info!(
        "Using DeepFace classifier at {} (detector: {}, timeout: {}s, max concurrent: {})",
        config.classifier.base_url,
        config.classifier.detector_backend,
        config.classifier.timeout_secs,
        config.classifier.max_concurrent
    );

    let history = MessageLog::new(&config.history.database_url).map_err(|e| {
        format!(
            "Failed to open message history {}: {}",
            config.history.database_url, e
        )
    })?;

    let state = Arc::new(AppState::new(config.clone(), classifier, history));
    state.uploads.ensure_dir().await.map_err(|e| {
        format!(
            "Failed to create upload directory {}: {}",
            state.uploads.dir().display(),
            e
        )
    })?;
    tracing::info!("Storing uploads in {}", state.uploads.dir().display());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
