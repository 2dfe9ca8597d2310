//! DeepFace classifier implementation.

use std::collections::BTreeMap;
use std::io::Cursor;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use vision_ai_common::{ChannelOrder, DecodedFrame};

use super::{EmotionClassifier, FaceEmotion, FaceRegion, InferenceError};

/// DeepFace emotion classifier.
///
/// Communicates with a DeepFace REST server (`deepface api`) to analyze
/// emotions. DeepFace works on OpenCV frames, so it expects BGR.
pub struct DeepFaceClassifier {
    http_client: Client,
    base_url: String,
    detector_backend: String,
}

impl DeepFaceClassifier {
    pub fn new(base_url: &str, detector_backend: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            detector_backend: detector_backend.to_string(),
        }
    }
}

// ============================================================================
// DeepFace API types
// ============================================================================

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    img: String,
    actions: [&'static str; 1],
    enforce_detection: bool,
    detector_backend: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    results: Vec<AnalyzeResult>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    emotion: BTreeMap<String, f64>,
    #[serde(default)]
    dominant_emotion: Option<String>,
    #[serde(default)]
    region: Option<DeepFaceRegion>,
    #[serde(default)]
    face_confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DeepFaceRegion {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

impl From<AnalyzeResult> for FaceEmotion {
    fn from(result: AnalyzeResult) -> Self {
        Self {
            scores: result.emotion,
            dominant: result.dominant_emotion,
            region: result.region.map(|r| FaceRegion {
                x: r.x,
                y: r.y,
                w: r.w,
                h: r.h,
            }),
            face_confidence: result.face_confidence,
        }
    }
}

// ============================================================================
// EmotionClassifier implementation
// ============================================================================

#[async_trait]
impl EmotionClassifier for DeepFaceClassifier {
    fn name(&self) -> &'static str {
        "deepface"
    }

    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Bgr
    }

    async fn health_check(&self) -> Result<(), InferenceError> {
        let url = format!("{}/", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(InferenceError::Unavailable(format!(
                "DeepFace returned {}",
                response.status()
            )))
        }
    }

    async fn classify(&self, frame: &DecodedFrame) -> Result<Vec<FaceEmotion>, InferenceError> {
        let (width, height) = (frame.width(), frame.height());
        let frame = frame.clone();
        let png = tokio::task::spawn_blocking(move || encode_png(frame))
            .await
            .map_err(|e| InferenceError::Other(format!("PNG encoder task failed: {}", e)))??;

        let url = format!("{}/analyze", self.base_url);
        let request = AnalyzeRequest {
            img: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
            actions: ["emotion"],
            enforce_detection: false,
            detector_backend: &self.detector_backend,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Backend {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let analysis: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            "DeepFace analyzed {}x{} frame: {} face(s)",
            width,
            height,
            analysis.results.len()
        );

        Ok(analysis.results.into_iter().map(FaceEmotion::from).collect())
    }
}

/// Encode a frame as PNG for transport.
///
/// PNG stores RGB, so BGR frames are swapped back here; the DeepFace server
/// decodes with OpenCV, which restores BGR on its side.
fn encode_png(frame: DecodedFrame) -> Result<Vec<u8>, InferenceError> {
    let (width, height) = (frame.width(), frame.height());
    let rgb = frame.into_order(ChannelOrder::Rgb).into_bytes();
    let image = RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| InferenceError::Other("frame buffer does not match its size".into()))?;

    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| InferenceError::Other(format!("failed to encode frame: {}", e)))?;
    Ok(out.into_inner())
}

/// Pull a readable message out of a DeepFace error body.
///
/// The server reports failures as `{"error": ...}` or `{"exception": ...}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "exception"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(String::from))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
