//! HTTP API.

pub mod chat;
pub mod emotion;
pub mod health;
pub mod messages;
pub mod upload;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;

use crate::error::Error;
use crate::AppState;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(emotion::router())
        .merge(chat::router())
        .merge(messages::router())
        .merge(upload::router())
        .merge(health::router())
}

/// Map an extractor rejection to an API error, keeping 413 for oversized bodies.
fn rejection_error(status: StatusCode, fallback: Error) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge
    } else {
        fallback
    }
}
