//! Emotion classification endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use vision_ai_common::{EmotionRequest, EmotionResult};

use super::rejection_error;
use crate::error::{Error, Result};
use crate::AppState;

/// Build the emotion router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/emotion", post(analyze_emotion))
}

/// POST /api/emotion - classify the dominant emotion of the first face in a
/// base64 image.
async fn analyze_emotion(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<EmotionRequest>, JsonRejection>,
) -> Result<Json<EmotionResult>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected emotion request: {}", rejection.body_text());
        rejection_error(rejection.status(), Error::MissingImage)
    })?;

    match state.pipeline.analyze(request).await {
        Ok(result) => {
            tracing::info!(
                "Emotion {} ({:.2}) from {}",
                result.emotion(),
                result.confidence(),
                state.pipeline.classifier().name()
            );
            Ok(Json(result))
        }
        Err(e) => {
            match &e {
                Error::Decode(_) => tracing::warn!("Emotion request failed: {}", e),
                _ => tracing::error!("Emotion request failed: {}", e),
            }
            if state.config.classifier.expose_errors {
                Err(e)
            } else {
                Err(e.redacted())
            }
        }
    }
}
