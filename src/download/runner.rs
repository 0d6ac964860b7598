//! Drives one extraction end-to-end for one request.
//!
//! The runner owns the progress channel: the engine runs in its own task and
//! pushes samples, the runner's select loop drains them into the tracker.
//! Telegram latency therefore never backs up into the engine; at worst the
//! bounded channel fills and the engine drops samples.

use crate::core::config;
use crate::core::error::DownloadError;
use crate::download::engine::{Extraction, ExtractionEngine, ProgressSample};
use crate::download::options::{ExtractionConfig, MediaKind};
use crate::download::progress::ProgressTracker;
use crate::download::ytdlp::artifact_path;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// The file produced by one job: path, classification, and size.
///
/// Owned exclusively by the request that produced it until the coordinator
/// deletes it after delivery.
#[derive(Debug, Clone)]
pub struct DownloadedArtifact {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub size_bytes: u64,
}

/// Run one extraction: invoke the engine, stream progress into the tracker,
/// validate the output artifact.
///
/// A single failed attempt is terminal for the request; nothing here
/// retries. All failures are logged with URL and profile context before
/// being surfaced.
pub async fn run(
    engine: Arc<dyn ExtractionEngine>,
    url: &Url,
    config: &ExtractionConfig,
    tracker: &mut ProgressTracker,
    download_dir: &Path,
) -> Result<DownloadedArtifact, DownloadError> {
    let (progress_tx, mut progress_rx) = mpsc::channel::<ProgressSample>(config::progress::CHANNEL_CAPACITY);

    let engine_url = url.clone();
    let engine_config = config.clone();
    let mut extract_handle =
        tokio::spawn(async move { engine.extract(&engine_url, &engine_config, progress_tx).await });

    let extraction: Extraction = loop {
        tokio::select! {
            // Drain pending samples before observing completion, so progress
            // emitted just before the engine returns still reaches the user.
            biased;
            Some(sample) = progress_rx.recv() => {
                tracker.on_sample(&sample).await;
            }
            result = &mut extract_handle => {
                let extraction = result
                    .map_err(|e| DownloadError::Extraction(format!("extraction task panicked: {}", e)))?
                    .map_err(|e| {
                        log::error!(
                            "Extraction failed for {} (profile {}): {}",
                            url,
                            config.profile().tag(),
                            e
                        );
                        e
                    })?;
                break extraction;
            }
        }
    };

    let path = artifact_path(download_dir, &extraction.title, config.output_extension());

    let metadata = match fs::metadata(&path) {
        Ok(m) => m,
        Err(_) => {
            log::error!(
                "Expected artifact missing after extraction of {} (profile {}): {}",
                url,
                config.profile().tag(),
                path.display()
            );
            return Err(DownloadError::ArtifactMissing(path.display().to_string()));
        }
    };

    if metadata.len() == 0 {
        log::error!(
            "Artifact is empty after extraction of {} (profile {}): {}",
            url,
            config.profile().tag(),
            path.display()
        );
        // A zero-byte file is useless; remove it here so nothing leaks even
        // though the coordinator never sees an artifact handle for it.
        if let Err(e) = fs::remove_file(&path) {
            log::warn!("Failed to remove empty artifact {}: {}", path.display(), e);
        }
        return Err(DownloadError::EmptyArtifact(path.display().to_string()));
    }

    log::info!(
        "Downloaded '{}' ({} bytes) for {}",
        path.display(),
        metadata.len(),
        url
    );

    Ok(DownloadedArtifact {
        path,
        kind: config.kind(),
        size_bytes: metadata.len(),
    })
}
