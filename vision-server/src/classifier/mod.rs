//! Emotion classifier abstraction layer.
//!
//! This module defines the `EmotionClassifier` trait that puts the external
//! face-emotion capability behind a common interface, so the request
//! pipeline can run against DeepFace in production and a scripted fake in
//! tests.

mod deepface;

pub use deepface::DeepFaceClassifier;

use std::time::Duration;

use async_trait::async_trait;
use vision_ai_common::{ChannelOrder, DecodedFrame, EmotionScores};

/// Bounding box of a detected (or synthesized) face, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRegion {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

/// Raw emotion analysis for one face, as reported by a classifier.
///
/// `dominant` is whatever the backend claimed; callers re-derive it from
/// `scores`.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEmotion {
    pub scores: EmotionScores,
    pub dominant: Option<String>,
    pub region: Option<FaceRegion>,
    pub face_confidence: Option<f64>,
}

impl FaceEmotion {
    pub fn new(scores: EmotionScores) -> Self {
        Self {
            scores,
            dominant: None,
            region: None,
            face_confidence: None,
        }
    }
}

/// Failure inside the classification capability.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("classifier returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),

    #[error("classifier returned no results")]
    EmptyResults,

    #[error("classifier returned no usable emotion scores")]
    InvalidScores,

    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

/// Primary trait for emotion classifiers.
///
/// Implementations must be safe to call from concurrent requests; the
/// pipeline bounds how many calls run at once.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Short identifier for logs and the health endpoint (e.g., "deepface").
    fn name(&self) -> &'static str;

    /// Channel order the classifier expects frames in.
    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Bgr
    }

    /// Check if the backend is reachable.
    async fn health_check(&self) -> Result<(), InferenceError> {
        Ok(())
    }

    /// Analyze emotions for every face in the frame, in detection order.
    ///
    /// Runs in best-effort detection mode: a frame without a detectable face
    /// still yields one result covering the whole frame.
    async fn classify(&self, frame: &DecodedFrame) -> Result<Vec<FaceEmotion>, InferenceError>;
}
