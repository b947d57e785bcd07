//! Notification delivery.
//!
//! The watch loop only needs a "send this text" primitive, expressed by the
//! [`Notifier`] trait. [`TelegramNotifier`] implements it on top of the Telegram
//! Bot API `sendMessage` method for a single fixed chat.
//!
//! Delivery is attempted exactly once per call. Every failure, whether the
//! request never reached Telegram or Telegram refused it, surfaces as
//! [`WatchError::Dispatch`].

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use herald_common::config::AppConfig;
use herald_common::error::WatchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sink for outbound text notifications.
pub trait Notifier {
    /// Deliver `text` to the configured destination.
    fn send(&self, text: &str) -> impl Future<Output = Result<(), WatchError>> + Send;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one Telegram chat through the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, WatchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WatchError::Dispatch(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, WatchError> {
        Self::new(
            config.telegram_api_url.clone(),
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
        )
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }

    async fn deliver(&self, text: &str) -> Result<(), WatchError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            // The URL embeds the bot token; keep it out of the error text.
            .map_err(|e| WatchError::Dispatch(e.without_url().to_string()))?;

        let status = response.status();
        let body: BotApiResponse = response.json().await.map_err(|e| {
            WatchError::Dispatch(format!(
                "unreadable Bot API response (HTTP {}): {}",
                status.as_u16(),
                e.without_url()
            ))
        })?;

        if !status.is_success() || !body.ok {
            return Err(WatchError::Dispatch(format!(
                "Bot API rejected message (HTTP {}): {}",
                status.as_u16(),
                body.description.as_deref().unwrap_or("no description")
            )));
        }

        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> impl Future<Output = Result<(), WatchError>> + Send {
        async move {
            match self.deliver(text).await {
                Ok(()) => {
                    tracing::debug!(chat_id = %self.chat_id, "Telegram message sent");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(chat_id = %self.chat_id, error = %e, "Telegram delivery failed");
                    Err(e)
                }
            }
        }
    }
}
