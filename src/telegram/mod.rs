//! Telegram-facing layer: bot setup, dispatcher schema, notification sink.

pub mod bot;
pub mod downloads;
pub mod handlers;
pub mod keyboard;
pub mod notify;

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::features::FeatureAvailability;
use crate::download::engine::ExtractionEngine;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerError};
pub use notify::{Notifier, TelegramNotifier};

/// Shared dependencies injected into every handler.
#[derive(Clone)]
pub struct HandlerDeps {
    pub engine: Arc<dyn ExtractionEngine>,
    pub notifier: Arc<dyn Notifier>,
    pub features: FeatureAvailability,
    pub download_dir: PathBuf,
}

impl HandlerDeps {
    pub fn new(
        engine: Arc<dyn ExtractionEngine>,
        notifier: Arc<dyn Notifier>,
        features: FeatureAvailability,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            notifier,
            features,
            download_dir,
        }
    }
}
