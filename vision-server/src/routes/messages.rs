//! Chat message history endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use vision_ai_common::MessageRequest;

use super::rejection_error;
use crate::error::{Error, Result};
use crate::history::Message;
use crate::AppState;

/// Build the message history router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/messages", get(list_messages).post(create_message))
}

/// GET /api/messages - every stored message, oldest first.
async fn list_messages(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Message>>> {
    let messages = state.history.list()?;
    Ok(Json(messages))
}

/// POST /api/messages - store one message.
async fn create_message(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected message: {}", rejection.body_text());
        rejection_error(rejection.status(), Error::BadRequest(rejection.body_text()))
    })?;

    let (sender, text) = request
        .fields()
        .ok_or_else(|| Error::BadRequest("Sender and text are required".to_string()))?;

    let message = state.history.append(sender, text)?;
    Ok((StatusCode::CREATED, Json(message)))
}
