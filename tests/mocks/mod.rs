//! Mock engine and recording notification sink for integration tests.
//!
//! The mock engine plays back a scripted extraction (progress samples plus
//! an optional artifact file); the recording notifier captures every
//! user-visible side effect so tests can assert on the full conversation.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;
use teloxide::types::{ChatId, MessageId};
use tokio::sync::mpsc;
use url::Url;

use vidgrab::core::error::DownloadError;
use vidgrab::download::engine::{Extraction, ExtractionEngine, ProgressSample};
use vidgrab::download::options::ExtractionConfig;
use vidgrab::download::ytdlp::artifact_path;
use vidgrab::telegram::notify::{Notifier, NotifyError};

/// Scripted extraction engine.
pub struct MockEngine {
    title: String,
    samples: Vec<ProgressSample>,
    /// Bytes to write as the artifact; `None` simulates a vanished file.
    artifact: Option<Vec<u8>>,
    download_dir: PathBuf,
    calls: AtomicUsize,
}

impl MockEngine {
    pub fn new(title: &str, download_dir: &Path) -> Self {
        Self {
            title: title.to_string(),
            samples: Vec::new(),
            artifact: Some(vec![0u8; 512_000]),
            download_dir: download_dir.to_path_buf(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_samples(mut self, samples: Vec<ProgressSample>) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_artifact(mut self, bytes: Vec<u8>) -> Self {
        self.artifact = Some(bytes);
        self
    }

    /// The engine claims success but never writes a file.
    pub fn without_artifact(mut self) -> Self {
        self.artifact = None;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionEngine for MockEngine {
    async fn extract(
        &self,
        _url: &Url,
        config: &ExtractionConfig,
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<Extraction, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        for sample in &self.samples {
            let _ = progress_tx.send(sample.clone()).await;
        }

        if let Some(bytes) = &self.artifact {
            let path = artifact_path(&self.download_dir, &self.title, config.output_extension());
            std::fs::write(&path, bytes)?;
        }

        Ok(Extraction {
            title: self.title.clone(),
        })
    }
}

/// One recorded call on the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Message { chat: i64, text: String },
    Edit { chat: i64, message: i32, text: String },
    Video { chat: i64, path: PathBuf },
    Audio { chat: i64, path: PathBuf },
}

/// Notifier that records every call instead of talking to Telegram.
pub struct RecordingNotifier {
    events: Mutex<Vec<SinkEvent>>,
    next_message_id: AtomicI32,
    /// When set, `send_video`/`send_audio` fail after recording the attempt.
    fail_delivery: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_message_id: AtomicI32::new(1),
            fail_delivery: false,
        }
    }

    pub fn failing_delivery() -> Self {
        Self {
            fail_delivery: true,
            ..Self::new()
        }
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Texts of all Edit events for one chat, in order.
    pub fn edits(&self, chat: i64) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Edit { chat: c, text, .. } if c == chat => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, NotifyError> {
        self.record(SinkEvent::Message {
            chat: chat_id.0,
            text: text.to_string(),
        });
        Ok(MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit_message(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), NotifyError> {
        self.record(SinkEvent::Edit {
            chat: chat_id.0,
            message: message_id.0,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_video(&self, chat_id: ChatId, path: &Path) -> Result<(), NotifyError> {
        self.record(SinkEvent::Video {
            chat: chat_id.0,
            path: path.to_path_buf(),
        });
        if self.fail_delivery {
            return Err(NotifyError("Request Entity Too Large".to_string()));
        }
        Ok(())
    }

    async fn send_audio(&self, chat_id: ChatId, path: &Path) -> Result<(), NotifyError> {
        self.record(SinkEvent::Audio {
            chat: chat_id.0,
            path: path.to_path_buf(),
        });
        if self.fail_delivery {
            return Err(NotifyError("Request Entity Too Large".to_string()));
        }
        Ok(())
    }
}
