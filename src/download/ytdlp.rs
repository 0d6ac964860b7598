//! Extraction engine backed by the yt-dlp command-line tool.
//!
//! Two passes per job: a metadata pass (`--dump-json`) to learn the title,
//! then the download pass with `--newline` so progress arrives as parseable
//! lines on stdout. The artifact path is fixed up front from the sanitized
//! title, so the runner can derive the same path independently.

use crate::core::config;
use crate::core::error::DownloadError;
use crate::core::utils::sanitize_title;
use crate::download::engine::{Extraction, ExtractionEngine, ProgressSample};
use crate::download::options::{ExtractionConfig, PostProcessing};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tokio::process::Command as TokioCommand;
use tokio::sync::mpsc;
use tokio::time::timeout;
use url::Url;

/// How many trailing stderr lines to keep for error reporting.
const STDERR_TAIL_LINES: usize = 12;

/// Derives the artifact path for a title and extension inside `dir`.
///
/// Single source of truth shared by the engine (output template) and the
/// job runner (existence/size validation); the two must agree or every
/// job would end in `ArtifactMissing`.
pub fn artifact_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_title(title), extension))
}

/// Parses one yt-dlp `--newline` progress line into a sample.
///
/// Lines look like:
/// `[download]  42.5% of 10.00MiB at 500.00KiB/s ETA 00:10`
/// Anything without a `[download]` prefix and a percent token is not a
/// progress line (destinations, merger output, etc.).
pub fn parse_progress_line(line: &str) -> Option<ProgressSample> {
    if !line.contains("[download]") || !line.contains('%') {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();

    let mut percent = None;
    let mut speed = None;
    let mut eta = None;

    for (i, part) in parts.iter().enumerate() {
        if part.ends_with('%') {
            if let Ok(p) = part.trim_end_matches('%').parse::<f32>() {
                percent = Some(p.clamp(0.0, 100.0));
            }
        }

        // "at 500.00KiB/s"
        if *part == "at" && i + 1 < parts.len() {
            speed = Some(parts[i + 1].to_string());
        }

        // "ETA 00:10"
        if *part == "ETA" && i + 1 < parts.len() {
            eta = Some(parts[i + 1].to_string());
        }
    }

    percent.map(|p| ProgressSample::downloading(p, speed, eta))
}

/// Extraction engine that shells out to yt-dlp.
pub struct YtDlpEngine {
    download_dir: PathBuf,
}

impl YtDlpEngine {
    pub fn new(download_dir: PathBuf) -> Self {
        Self { download_dir }
    }

    /// Metadata pass: ask yt-dlp for the media title without downloading.
    async fn fetch_title(&self, url: &Url) -> Result<String, DownloadError> {
        let output = timeout(
            config::extraction::metadata_timeout(),
            TokioCommand::new(&*config::YTDL_BIN)
                .args(["--dump-json", "--no-playlist", url.as_str()])
                .output(),
        )
        .await
        .map_err(|_| DownloadError::Extraction("yt-dlp metadata query timed out".to_string()))?
        .map_err(|e| DownloadError::Extraction(format!("failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::Extraction(format!(
                "yt-dlp metadata query failed: {}",
                stderr_tail(&stderr)
            )));
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| DownloadError::Extraction(format!("failed to parse yt-dlp metadata: {}", e)))?;

        info["title"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DownloadError::Extraction("yt-dlp metadata has no title".to_string()))
    }

    /// Command-line arguments for the download pass.
    fn download_args(&self, url: &Url, config: &ExtractionConfig, title: &str) -> Vec<String> {
        let out_template = self
            .download_dir
            .join(format!("{}.%(ext)s", sanitize_title(title)))
            .to_string_lossy()
            .into_owned();

        let mut args = vec![
            "--newline".to_string(),
            "--no-playlist".to_string(),
            "-f".to_string(),
            config.format_selector.to_string(),
            "-o".to_string(),
            out_template,
        ];

        for step in &config.postprocessing {
            match step {
                PostProcessing::RecodeMp4 => {
                    args.push("--recode-video".to_string());
                    args.push("mp4".to_string());
                }
                PostProcessing::ExtractAudio { codec, quality } => {
                    args.push("-x".to_string());
                    args.push("--audio-format".to_string());
                    args.push((*codec).to_string());
                    args.push("--audio-quality".to_string());
                    args.push((*quality).to_string());
                }
            }
        }

        args.push(url.as_str().to_string());
        args
    }
}

#[async_trait]
impl ExtractionEngine for YtDlpEngine {
    async fn extract(
        &self,
        url: &Url,
        config: &ExtractionConfig,
        progress_tx: mpsc::Sender<ProgressSample>,
    ) -> Result<Extraction, DownloadError> {
        let title = self.fetch_title(url).await?;
        log::info!("Starting yt-dlp download for '{}' ({})", title, url);

        let args = self.download_args(url, config, &title);

        // The download pass does blocking reads of the child's stdout, so it
        // runs on the blocking pool; progress crosses back over the channel.
        let result = tokio::task::spawn_blocking(move || run_with_progress(&args, &progress_tx))
            .await
            .map_err(|e| DownloadError::Extraction(format!("extraction task failed: {}", e)))?;

        result?;
        Ok(Extraction { title })
    }
}

/// Run the yt-dlp download pass, streaming progress lines into the channel.
///
/// Uses `try_send`: when the consumer lags and the channel fills up, samples
/// are dropped rather than blocking the reader thread and, transitively, the
/// child's stdout pipe.
fn run_with_progress(args: &[String], progress_tx: &mpsc::Sender<ProgressSample>) -> Result<(), DownloadError> {
    let mut child = Command::new(&*config::YTDL_BIN)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DownloadError::Extraction(format!("failed to start yt-dlp: {}", e)))?;

    // Collect a stderr tail on a helper thread for error reporting.
    let stderr = child.stderr.take();
    let stderr_handle = std::thread::spawn(move || {
        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        if let Some(stream) = stderr {
            for line in BufReader::new(stream).lines().map_while(Result::ok) {
                log::debug!("yt-dlp stderr: {}", line);
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
        }
        tail
    });

    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            log::debug!("yt-dlp: {}", line);
            if let Some(sample) = parse_progress_line(&line) {
                let _ = progress_tx.try_send(sample);
            }
        }
    }

    let status = child
        .wait()
        .map_err(|e| DownloadError::Extraction(format!("yt-dlp process failed: {}", e)))?;

    let tail = stderr_handle.join().unwrap_or_default();

    if !status.success() {
        let detail: Vec<String> = tail.into();
        return Err(DownloadError::Extraction(format!(
            "yt-dlp exited with {}: {}",
            status,
            detail.join(" | ")
        )));
    }

    let _ = progress_tx.try_send(ProgressSample::finished());
    Ok(())
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}

/// Logs the installed yt-dlp version at startup, a quick sanity check that
/// the binary is actually present.
pub async fn log_ytdlp_version() {
    match TokioCommand::new(&*config::YTDL_BIN).arg("--version").output().await {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            log::info!("yt-dlp version: {}", version);
        }
        Ok(_) | Err(_) => {
            log::warn!(
                "yt-dlp not found (looked for '{}'); downloads will fail until it is installed",
                &*config::YTDL_BIN
            );
        }
    }
}
