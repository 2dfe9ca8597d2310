//! Fixtures shared by unit and integration tests.

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, Rgb, RgbImage};
use vision_ai_common::{DecodedFrame, EmotionScores};

use crate::classifier::{EmotionClassifier, FaceEmotion, InferenceError};
use crate::config::{Config, UploadsConfig};
use crate::history::MessageLog;
use crate::AppState;

pub fn test_config(upload_dir: &Path) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.uploads = UploadsConfig {
        dir: upload_dir.to_path_buf(),
    };
    config.classifier.timeout_secs = 5;
    config.history.database_url = ":memory:".to_string();
    config.logging.level = "debug".to_string();
    config
}

pub fn create_test_state(config: Config, classifier: Arc<dyn EmotionClassifier>) -> Arc<AppState> {
    let history = MessageLog::new(&config.history.database_url).unwrap();
    Arc::new(AppState::new(config, classifier, history))
}

/// PNG bytes of a `width` x `height` image filled with one RGB color.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode test PNG");
    out.into_inner()
}

/// JPEG bytes of a `width` x `height` image filled with one RGB color.
pub fn solid_jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Jpeg)
        .expect("Failed to encode test JPEG");
    out.into_inner()
}

pub fn png_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn scores(pairs: &[(&str, f64)]) -> EmotionScores {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

enum Behavior {
    Faces(Vec<FaceEmotion>),
    Fail(String),
}

/// Scripted classifier that records the frames it is given.
pub struct MockClassifier {
    behavior: Behavior,
    delay: Option<Duration>,
    healthy: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_frame: Mutex<Option<DecodedFrame>>,
}

impl MockClassifier {
    pub fn with_faces(faces: Vec<FaceEmotion>) -> Self {
        Self::new(Behavior::Faces(faces))
    }

    /// One face, clearly happy.
    pub fn happy() -> Self {
        let mut face = FaceEmotion::new(scores(&[
            ("angry", 0.5),
            ("happy", 92.0),
            ("neutral", 7.5),
        ]));
        face.dominant = Some("happy".to_string());
        Self::with_faces(vec![face])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Behavior::Fail(message.to_string()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of `classify` calls observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_frame(&self) -> Option<DecodedFrame> {
        self.last_frame.lock().unwrap().clone()
    }

    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: None,
            healthy: true,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            last_frame: Mutex::new(None),
        }
    }
}

#[async_trait]
impl EmotionClassifier for MockClassifier {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn health_check(&self) -> Result<(), InferenceError> {
        if self.healthy {
            Ok(())
        } else {
            Err(InferenceError::Unavailable("mock is down".to_string()))
        }
    }

    async fn classify(&self, frame: &DecodedFrame) -> Result<Vec<FaceEmotion>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        *self.last_frame.lock().unwrap() = Some(frame.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Faces(faces) => Ok(faces.clone()),
            Behavior::Fail(message) => Err(InferenceError::Other(message.clone())),
        }
    }
}
