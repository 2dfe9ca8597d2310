//! Error types for the vision server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use vision_ai_common::ErrorBody;

use crate::classifier::InferenceError;
use crate::history::HistoryError;
use crate::pipeline::DecodeError;

/// Message returned when the emotion request carries no usable image.
pub const MISSING_IMAGE: &str = "image (base64) required";

/// Errors surfaced by HTTP handlers.
///
/// Every variant renders as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("image (base64) required")]
    MissingImage,

    #[error("emotion inference failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("emotion inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("emotion inference failed")]
    InferenceRedacted,

    #[error("{0}")]
    BadRequest(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("{0}")]
    History(#[from] HistoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingImage | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Decode(_)
            | Error::Inference(_)
            | Error::InferenceRedacted
            | Error::Storage(_)
            | Error::History(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Replace inference details with a generic message.
    pub fn redacted(self) -> Self {
        match self {
            Error::Inference(_) => Error::InferenceRedacted,
            other => other,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
