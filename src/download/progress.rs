//! Progress rendering and rate-limited status-message updates for one job.

use crate::core::config::progress::BAR_WIDTH;
use crate::download::engine::{ProgressSample, SampleStatus};
use crate::telegram::notify::Notifier;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};

/// Creates a visual progress bar scaled to the percent value.
///
/// Always exactly `BAR_WIDTH` cells; the filled-cell count is
/// `floor(BAR_WIDTH * percent / 100)`, so 0% is fully unfilled and 100%
/// fully filled.
pub fn create_progress_bar(percent: f32) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((BAR_WIDTH as f32 * percent) / 100.0).floor() as usize;
    let empty = BAR_WIDTH - filled;

    format!("[{}{}] {:.1}%", "█".repeat(filled), "░".repeat(empty), percent)
}

/// Formats the status-message text for one downloading-status sample.
pub fn format_status_line(sample: &ProgressSample) -> String {
    let bar = create_progress_bar(sample.percent);
    let speed = sample.speed.as_deref().unwrap_or("N/A");
    let eta = sample.eta.as_deref().unwrap_or("N/A");
    format!("Скачивание: {}\nСкорость: {} | Осталось: {}", bar, speed, eta)
}

/// Rate-limited progress feedback for one job.
///
/// Bound to the status message created at the start of the request; each
/// rendered sample becomes one "edit message" call on the notification sink.
/// Update cadence is bounded by the engine's own event rate; the tracker
/// does no independent debouncing beyond skipping samples that would render
/// identical text (Telegram rejects "message is not modified" edits anyway).
///
/// A failed edit is logged and swallowed: UI feedback must never abort the
/// underlying extraction.
pub struct ProgressTracker {
    notifier: Arc<dyn Notifier>,
    chat_id: ChatId,
    message_id: MessageId,
    last_text: Option<String>,
}

impl ProgressTracker {
    /// Create a tracker bound to an existing status message.
    pub fn new(notifier: Arc<dyn Notifier>, chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            notifier,
            chat_id,
            message_id,
            last_text: None,
        }
    }

    /// Handle one progress sample from the extraction engine.
    ///
    /// Only `Downloading` samples are rendered; `Finished` and other
    /// statuses are the job runner's business.
    pub async fn on_sample(&mut self, sample: &ProgressSample) {
        if sample.status != SampleStatus::Downloading {
            return;
        }

        let text = format_status_line(sample);
        if self.last_text.as_deref() == Some(text.as_str()) {
            return;
        }

        match self.notifier.edit_message(self.chat_id, self.message_id, &text).await {
            Ok(()) => {
                self.last_text = Some(text);
            }
            Err(e) => {
                // Non-fatal: the download keeps going either way.
                log::warn!("Failed to update progress message for chat {}: {}", self.chat_id, e);
            }
        }
    }
}
