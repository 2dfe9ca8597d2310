//! Vision AI server - emotion classification gateway, chat echo with message
//! history, and file uploads.

pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod pipeline;
pub mod routes;
pub mod storage;
pub mod test_util;

pub use classifier::{DeepFaceClassifier, EmotionClassifier, FaceEmotion, InferenceError};
pub use config::Config;
pub use error::{Error, Result};
pub use history::MessageLog;
pub use pipeline::EmotionPipeline;
pub use storage::UploadStore;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub config: Config,
    pub pipeline: EmotionPipeline,
    pub uploads: UploadStore,
    pub history: MessageLog,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: Config,
        classifier: Arc<dyn EmotionClassifier>,
        history: MessageLog,
    ) -> Self {
        let pipeline = EmotionPipeline::new(
            classifier,
            config.classifier.max_concurrent,
            config.classifier.timeout(),
        );
        let uploads = UploadStore::new(config.uploads.dir.clone());

        Self {
            config,
            pipeline,
            uploads,
            history,
            started_at: Utc::now(),
        }
    }
}

/// Build the full application router with its middleware stack.
pub fn app(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    routes::router()
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging::request_logger))
        .with_state(state)
}
