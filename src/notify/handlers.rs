//! HTTP surface of the notification side-channel.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::http::response::{json_error, not_found};
use crate::notify::sanitize::prepare;
use crate::notify::telegram::{ChatIdsOutcome, NotifyError, SendOutcome, TelegramNotifier};

pub const SEND_PATH: &str = "/api/telegram/send";
pub const CHAT_IDS_PATH: &str = "/api/telegram/getchatid";

/// Routes for the side-channel, bound to `notifier`.
pub fn router(notifier: Arc<TelegramNotifier>) -> Router {
    Router::new()
        .route(SEND_PATH, post(send_message).fallback(not_found))
        .route(CHAT_IDS_PATH, get(chat_ids).fallback(not_found))
        .with_state(notifier)
}

fn invalid_message() -> Response {
    json_error(StatusCode::BAD_REQUEST, NotifyError::InvalidMessage.to_string())
}

/// `POST /api/telegram/send` with `{"message": "..."}`.
pub async fn send_message(
    State(notifier): State<Arc<TelegramNotifier>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return invalid_message();
    };
    let Some(message) = body.get("message").and_then(Value::as_str) else {
        return invalid_message();
    };

    let text = match prepare(message) {
        Ok(text) => text,
        Err(_) => return invalid_message(),
    };

    match notifier.send(&text).await {
        Ok(SendOutcome::Delivered) => Json(json!({
            "success": true,
            "message": "Message sent to Telegram",
        }))
        .into_response(),
        Ok(SendOutcome::NotConfigured) => Json(json!({
            "success": true,
            "message": "Telegram not configured",
        }))
        .into_response(),
        Err(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to send message to Telegram",
        ),
    }
}

/// `GET /api/telegram/getchatid`: diagnostic helper for finding the
/// numeric chat id to configure.
pub async fn chat_ids(State(notifier): State<Arc<TelegramNotifier>>) -> Response {
    match notifier.chat_ids().await {
        Ok(ChatIdsOutcome::Chats(chats)) => {
            Json(json!({ "success": true, "chats": chats })).into_response()
        }
        Ok(ChatIdsOutcome::NoUpdates) => Json(json!({
            "success": false,
            "message": "No messages yet. Send the bot a message first.",
        }))
        .into_response(),
        Ok(ChatIdsOutcome::NotConfigured) => Json(json!({
            "success": false,
            "message": "Telegram not configured",
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch chat ids");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to fetch chat ids",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
