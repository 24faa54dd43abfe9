//! Telegram Bot API provider.
//!
//! One delivery attempt per call: no retry, no queue. A provider that is
//! not configured is a soft no-op, distinct from a provider that rejects
//! the message.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::NotificationConfig;
use crate::observability::metrics;

pub const BOT_TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN";
pub const CHAT_ID_PLACEHOLDER: &str = "YOUR_CHAT_ID";

/// Empty values and the shipped placeholders count as unset.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == BOT_TOKEN_PLACEHOLDER || value == CHAT_ID_PLACEHOLDER
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Valid message is required")]
    InvalidMessage,

    #[error("provider responded with status {status}")]
    Rejected { status: u16, body: String },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    NotConfigured,
}

/// A distinct sender seen in the bot's recent updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatIdsOutcome {
    Chats(Vec<ChatSummary>),
    NoUpdates,
    NotConfigured,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdatesResponse {
    ok: bool,
    result: Vec<Update>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Update {
    message: Option<UpdateMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateMessage {
    chat: Option<Chat>,
    from: Option<Sender>,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Chat {
    id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Sender {
    username: Option<String>,
    first_name: Option<String>,
}

/// Client for the messaging provider.
pub struct TelegramNotifier {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
    chat_id: Option<i64>,
}

impl TelegramNotifier {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        token: Option<String>,
        chat_id: Option<i64>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            chat_id,
        }
    }

    pub fn from_config(config: &NotificationConfig, http: reqwest::Client) -> Self {
        let token = config
            .bot_token
            .as_deref()
            .filter(|t| !is_placeholder(t))
            .map(|t| t.trim().to_string());

        let chat_id = config
            .chat_id
            .as_deref()
            .filter(|c| !is_placeholder(c))
            .and_then(|c| match c.trim().parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(chat_id = %c, "Ignoring non-numeric chat id");
                    None
                }
            });

        let notifier = Self::new(http, config.api_base.clone(), token, chat_id);
        tracing::info!(
            configured = notifier.is_configured(),
            api_base = %notifier.api_base,
            "Notification provider initialised"
        );
        notifier
    }

    /// Both the bot token and the target chat are known.
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, token, method)
    }

    /// Deliver already-sanitized `text` to the configured chat.
    pub async fn send(&self, text: &str) -> Result<SendOutcome, NotifyError> {
        let (Some(token), Some(chat_id)) = (self.token.as_deref(), self.chat_id) else {
            tracing::debug!("Notification skipped, provider not configured");
            metrics::record_notification("not_configured");
            return Ok(SendOutcome::NotConfigured);
        };

        let result = self
            .http
            .post(self.method_url(token, "sendMessage"))
            .json(&SendMessage { chat_id, text })
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Notification transport failure");
                metrics::record_notification("failed");
                return Err(NotifyError::Transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Provider rejected notification");
            metrics::record_notification("rejected");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(chars = text.chars().count(), "Notification delivered");
        metrics::record_notification("delivered");
        Ok(SendOutcome::Delivered)
    }

    /// List the distinct chats that recently wrote to the bot.
    pub async fn chat_ids(&self) -> Result<ChatIdsOutcome, NotifyError> {
        let Some(token) = self.token.as_deref() else {
            return Ok(ChatIdsOutcome::NotConfigured);
        };

        let response = self
            .http
            .get(self.method_url(token, "getUpdates"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let updates: UpdatesResponse = response.json().await?;
        if !updates.ok {
            return Ok(ChatIdsOutcome::NoUpdates);
        }

        let chats = distinct_chats(updates.result);
        if chats.is_empty() {
            Ok(ChatIdsOutcome::NoUpdates)
        } else {
            Ok(ChatIdsOutcome::Chats(chats))
        }
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// First occurrence wins; updates without a chat are skipped.
fn distinct_chats(updates: Vec<Update>) -> Vec<ChatSummary> {
    let mut seen = HashSet::new();
    updates
        .into_iter()
        .filter_map(|u| {
            let message = u.message?;
            let chat_id = message.chat.as_ref().and_then(|c| c.id)?;
            let from = message.from.unwrap_or_default();
            Some(ChatSummary {
                chat_id,
                username: from.username,
                first_name: from.first_name,
                message: message.text,
            })
        })
        .filter(|c| seen.insert(c.chat_id))
        .collect()
}
