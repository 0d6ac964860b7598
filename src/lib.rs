//! Vidgrab - Telegram bot for downloading videos and audio via yt-dlp
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, feature probing
//! - `download`: Profiles, extraction engine, progress, job runner
//! - `telegram`: Bot integration, dispatcher schema, notification sink

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{init_logger, DownloadError, FeatureAvailability};
pub use download::{DownloadProfile, ExtractionConfig, ExtractionEngine};
pub use telegram::{create_bot, schema, HandlerDeps, Notifier, TelegramNotifier};
