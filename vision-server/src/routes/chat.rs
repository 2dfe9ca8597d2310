//! Echo chat endpoint. Each exchange is recorded in the message history.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use vision_ai_common::{ChatReply, ChatRequest};

use super::rejection_error;
use crate::error::{Error, Result};
use crate::history::{SENDER_AI, SENDER_USER};
use crate::AppState;

/// Build the chat router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

/// POST /chat - reply with the message prefixed by "AI says: ".
async fn chat(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected chat request: {}", rejection.body_text());
        rejection_error(rejection.status(), Error::BadRequest(rejection.body_text()))
    })?;

    let reply = ChatReply::echo(&request.message);

    // History is best effort; an empty message is not recorded.
    if !request.message.is_empty() {
        let recorded = state
            .history
            .append(SENDER_USER, &request.message)
            .and_then(|_| state.history.append(SENDER_AI, &reply.reply));
        if let Err(e) = recorded {
            tracing::warn!("Failed to record chat exchange: {}", e);
        }
    }

    Ok(Json(reply))
}
