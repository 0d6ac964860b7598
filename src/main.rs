use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;

use vidgrab::cli::Cli;
use vidgrab::core::{config, init_logger, FeatureAvailability};
use vidgrab::download::ytdlp::{log_ytdlp_version, YtDlpEngine};
use vidgrab::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TelegramNotifier};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, bot creation,
/// download directory).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log dispatcher panics instead of dying silently.
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    // Load environment variables from .env if present
    let _ = dotenv();

    let log_file = cli.log_file.unwrap_or_else(|| config::LOG_FILE_PATH.clone());
    init_logger(&log_file)?;

    log::info!("Starting bot...");
    log_ytdlp_version().await;

    let features = FeatureAvailability::probe();

    let download_dir = PathBuf::from(config::DOWNLOAD_FOLDER.as_str());
    std::fs::create_dir_all(&download_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create download folder {}: {}", download_dir.display(), e))?;
    log::info!("Download folder: {}", download_dir.display());

    let bot = create_bot()?;
    setup_bot_commands(&bot).await?;

    let deps = HandlerDeps::new(
        Arc::new(YtDlpEngine::new(download_dir.clone())),
        Arc::new(TelegramNotifier::new(bot.clone())),
        features,
        download_dir,
    );

    log::info!("Ready to receive updates");

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
