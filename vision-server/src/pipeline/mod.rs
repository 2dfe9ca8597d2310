//! Image ingestion and inference pipeline behind POST /api/emotion.
//!
//! payload → base64 decode → image decode → channel swap → classifier →
//! first-face selection. Each request runs start to finish with no state
//! shared across requests beyond the classifier and its concurrency limit.

mod decode;
mod invoke;
mod payload;

pub use decode::{decode_frame, DecodeError};
pub use invoke::select_result;
pub use payload::extract_base64;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use vision_ai_common::{EmotionRequest, EmotionResult};

use crate::classifier::{EmotionClassifier, InferenceError};
use crate::error::{Error, Result};

/// Runs emotion requests against one classifier.
///
/// Classifier calls are bounded by a semaphore and a per-call timeout, since
/// model backends are not assumed reentrant and can stall.
pub struct EmotionPipeline {
    classifier: Arc<dyn EmotionClassifier>,
    permits: Semaphore,
    timeout: Duration,
}

impl EmotionPipeline {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        max_concurrent: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            permits: Semaphore::new(max_concurrent.max(1)),
            timeout,
        }
    }

    pub fn classifier(&self) -> &Arc<dyn EmotionClassifier> {
        &self.classifier
    }

    /// Decode the request's image and classify the first face in it.
    pub async fn analyze(&self, request: EmotionRequest) -> Result<EmotionResult> {
        let order = self.classifier.channel_order();
        let frame = tokio::task::spawn_blocking(move || {
            decode_frame(extract_base64(&request.image), order)
        })
        .await
        .map_err(|e| Error::Internal(format!("decoder task failed: {}", e)))??;

        tracing::debug!(
            "Decoded {}x{} frame ({}) for {}",
            frame.width(),
            frame.height(),
            frame.order(),
            self.classifier.name()
        );

        let faces = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| Error::Internal(format!("Semaphore error: {}", e)))?;

            tokio::time::timeout(self.timeout, self.classifier.classify(&frame))
                .await
                .map_err(|_| InferenceError::Timeout(self.timeout))??
        };

        Ok(select_result(faces)?)
    }
}
