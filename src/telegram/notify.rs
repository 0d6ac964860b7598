//! Notification sink abstraction over the Telegram API.
//!
//! The orchestration layer talks to this trait instead of the teloxide `Bot`
//! directly, so integration tests can record every user-visible side effect
//! without a network.

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};
use thiserror::Error;

/// A rejected notification-sink call. Carries the transport's reason string.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct NotifyError(pub String);

/// The chat-facing operations the bot performs.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a text message, returning its id for later edits.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, NotifyError>;

    /// Edit a previously sent message in place.
    async fn edit_message(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), NotifyError>;

    /// Deliver a file as a playable video.
    async fn send_video(&self, chat_id: ChatId, path: &Path) -> Result<(), NotifyError>;

    /// Deliver a file as a playable audio track.
    async fn send_audio(&self, chat_id: ChatId, path: &Path) -> Result<(), NotifyError>;
}

/// Production notifier backed by the teloxide `Bot`.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, NotifyError> {
        let msg = self
            .bot
            .send_message(chat_id, text)
            .await
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(msg.id)
    }

    async fn edit_message(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), NotifyError> {
        match self.bot.edit_message_text(chat_id, message_id, text).await {
            Ok(_) => Ok(()),
            Err(e) => {
                // Re-rendering identical text is normal, not a failure.
                if e.to_string().contains("message is not modified") {
                    return Ok(());
                }
                Err(NotifyError(e.to_string()))
            }
        }
    }

    async fn send_video(&self, chat_id: ChatId, path: &Path) -> Result<(), NotifyError> {
        self.bot
            .send_video(chat_id, InputFile::file(path))
            .await
            .map(|_| ())
            .map_err(|e| NotifyError(e.to_string()))
    }

    async fn send_audio(&self, chat_id: ChatId, path: &Path) -> Result<(), NotifyError> {
        self.bot
            .send_audio(chat_id, InputFile::file(path))
            .await
            .map(|_| ())
            .map_err(|e| NotifyError(e.to_string()))
    }
}
