use clap::Parser;

#[derive(Parser)]
#[command(name = "vidgrab")]
#[command(author, version, about = "Telegram bot for downloading videos and audio via yt-dlp", long_about = None)]
pub struct Cli {
    /// Path to the log file
    #[arg(long)]
    pub log_file: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
