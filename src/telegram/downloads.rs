//! Per-request download coordination: status message, extraction, delivery,
//! cleanup.

use std::fs;
use std::sync::Arc;
use teloxide::types::ChatId;
use url::Url;

use crate::core::error::DownloadError;
use crate::download::options::{DownloadProfile, ExtractionConfig, MediaKind};
use crate::download::progress::ProgressTracker;
use crate::download::runner;
use crate::telegram::HandlerDeps;

pub const STARTING_MESSAGE: &str = "Начинаю загрузку...";
pub const COMPLETED_MESSAGE: &str = "Загрузка завершена!";

fn error_message(e: &DownloadError) -> String {
    format!("Произошла ошибка при скачивании: {}", e)
}

/// Handles one confirmed profile selection from start to finish.
///
/// One status message is created up front and reused for progress updates
/// and the final outcome. Whatever happens, at most one error message
/// reaches the user, and the downloaded file never outlives the request.
pub async fn handle_selection(deps: HandlerDeps, chat_id: ChatId, profile: DownloadProfile, url: Url) {
    log::info!("Starting download for chat {}: {} ({})", chat_id, url, profile.tag());

    let status_id = match deps.notifier.send_message(chat_id, STARTING_MESSAGE).await {
        Ok(id) => id,
        Err(e) => {
            // Without a status message there is no way to talk to the user;
            // abort before spending bandwidth on the extraction.
            log::error!("Failed to send status message to chat {}: {}", chat_id, e);
            return;
        }
    };

    let config = match ExtractionConfig::resolve(profile, &deps.features) {
        Ok(config) => config,
        Err(e) => {
            // Stale keyboard: the option was withdrawn after the prompt.
            log::warn!("Cannot resolve profile {} for chat {}: {}", profile.tag(), chat_id, e);
            if let Err(notify_err) = deps.notifier.edit_message(chat_id, status_id, &error_message(&e)).await {
                log::warn!("Failed to report error to chat {}: {}", chat_id, notify_err);
            }
            return;
        }
    };

    let mut tracker = ProgressTracker::new(Arc::clone(&deps.notifier), chat_id, status_id);

    let artifact = match runner::run(
        Arc::clone(&deps.engine),
        &url,
        &config,
        &mut tracker,
        &deps.download_dir,
    )
    .await
    {
        Ok(artifact) => artifact,
        Err(e) => {
            log::error!("Download failed for chat {} [{}]: {}", chat_id, e.kind(), e);
            if let Err(notify_err) = deps.notifier.edit_message(chat_id, status_id, &error_message(&e)).await {
                log::warn!("Failed to report error to chat {}: {}", chat_id, notify_err);
            }
            return;
        }
    };

    let delivery = match artifact.kind {
        MediaKind::Video => deps.notifier.send_video(chat_id, &artifact.path).await,
        MediaKind::Audio => deps.notifier.send_audio(chat_id, &artifact.path).await,
    };

    match delivery {
        Ok(()) => {
            if let Err(e) = deps.notifier.edit_message(chat_id, status_id, COMPLETED_MESSAGE).await {
                log::warn!("Failed to finalize status message for chat {}: {}", chat_id, e);
            }
        }
        Err(e) => {
            log::error!(
                "Failed to deliver {} to chat {}: {}",
                artifact.path.display(),
                chat_id,
                e
            );
            let err = DownloadError::Delivery(e.to_string());
            if let Err(notify_err) = deps.notifier.edit_message(chat_id, status_id, &error_message(&err)).await {
                log::warn!("Failed to report error to chat {}: {}", chat_id, notify_err);
            }
        }
    }

    // The artifact is removed whether delivery worked or not.
    if let Err(e) = fs::remove_file(&artifact.path) {
        log::warn!("Failed to remove artifact {}: {}", artifact.path.display(), e);
    } else {
        log::debug!("Removed artifact {}", artifact.path.display());
    }
}
