use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot

/// Cached yt-dlp binary path.
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp".
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Cached ffmpeg binary path.
/// Read once at startup from FFMPEG_BIN environment variable or defaults to "ffmpeg".
/// Probed at startup to decide whether the audio-only profile is offered.
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Download folder path.
/// Read from DOWNLOAD_FOLDER environment variable, defaults to ~/downloads.
/// Supports tilde (~) expansion for home directory.
pub static DOWNLOAD_FOLDER: Lazy<String> = Lazy::new(|| {
    let raw = env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "~/downloads".to_string());
    shellexpand::tilde(&raw).into_owned()
});

/// Log file path, overridable via LOG_FILE_PATH.
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "bot.log".to_string()));

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for HTTP requests (in seconds).
    /// Large video uploads through the Bot API can take a while.
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Progress reporting configuration
pub mod progress {
    /// Width of the progress bar in cells
    pub const BAR_WIDTH: usize = 20;

    /// Capacity of the bounded engine → tracker progress channel.
    /// The engine drops samples instead of blocking when the channel is full.
    pub const CHANNEL_CAPACITY: usize = 32;
}

/// Audio extraction configuration
pub mod audio {
    /// Target codec for the audio-only profile
    pub const CODEC: &str = "mp3";

    /// Target quality passed to yt-dlp's audio post-processor (~192 kbps)
    pub const QUALITY: &str = "192K";
}

/// Extraction engine configuration
pub mod extraction {
    use super::Duration;

    /// Timeout for the yt-dlp metadata pass (in seconds)
    pub const METADATA_TIMEOUT_SECS: u64 = 30;

    /// Metadata pass timeout duration
    pub fn metadata_timeout() -> Duration {
        Duration::from_secs(METADATA_TIMEOUT_SECS)
    }
}
