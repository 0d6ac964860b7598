//! Extraction engine abstraction.
//!
//! The engine is the component that actually fetches and transcodes media.
//! It is behind a trait so the orchestration layer (runner, coordinator) can
//! be exercised in tests with a simulated engine, and so another backend
//! could replace yt-dlp without touching the rest of the bot.
//!
//! Progress flows through an explicit bounded channel instead of a callback
//! running inside the engine's own execution context: the engine pushes
//! `ProgressSample`s, a consumer loop in the runner drains them. A slow or
//! failing Telegram edit therefore never stalls the download itself; the
//! engine drops samples when the channel is full.

use crate::core::error::DownloadError;
use crate::download::options::ExtractionConfig;
use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

/// Status reported by one engine progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// Transfer in progress; the sample carries percent/rate/ETA
    Downloading,
    /// Transfer complete (post-processing may still follow)
    Finished,
    /// Anything else the engine emits; ignored by the progress tracker
    Other,
}

/// One progress event from the extraction engine. Ephemeral, never persisted.
#[derive(Debug, Clone)]
pub struct ProgressSample {
    pub status: SampleStatus,
    /// Percent complete, 0–100
    pub percent: f32,
    /// Raw transfer rate string as reported by the engine (e.g. "1.24MiB/s")
    pub speed: Option<String>,
    /// Raw estimated-time-remaining string (e.g. "00:35")
    pub eta: Option<String>,
}

impl ProgressSample {
    /// Convenience constructor for a downloading-status sample.
    pub fn downloading(percent: f32, speed: Option<String>, eta: Option<String>) -> Self {
        Self {
            status: SampleStatus::Downloading,
            percent,
            speed,
            eta,
        }
    }

    /// Terminal sample emitted when the transfer completes.
    pub fn finished() -> Self {
        Self {
            status: SampleStatus::Finished,
            percent: 100.0,
            speed: None,
            eta: None,
        }
    }
}

/// Result of a successful extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Media title as reported by the extractor; the artifact file name is
    /// derived from it
    pub title: String,
}

/// Trait for extraction engine implementations.
///
/// `extract` runs to completion from the caller's perspective: the network
/// transfer plus any post-processing. Progress samples are pushed onto
/// `progress_tx` at the engine's own cadence.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    async fn extract(
        &self,
        url: &Url,
        config: &ExtractionConfig,
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<Extraction, DownloadError>;
}
