//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    started_at: DateTime<Utc>,
    classifier: ClassifierHealth,
}

#[derive(Serialize)]
struct ClassifierHealth {
    name: &'static str,
    healthy: bool,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET /health - always 200; reports whether the classifier backend answers.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let classifier = state.pipeline.classifier();
    let check = tokio::time::timeout(
        state.config.classifier.timeout(),
        classifier.health_check(),
    )
    .await;

    let healthy = match check {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!("Classifier {} unhealthy: {}", classifier.name(), e);
            false
        }
        Err(_) => {
            tracing::warn!("Classifier {} health check timed out", classifier.name());
            false
        }
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at,
        classifier: ClassifierHealth {
            name: classifier.name(),
            healthy,
        },
    })
}
