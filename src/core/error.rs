use thiserror::Error;

/// Centralized error taxonomy for one download request.
///
/// Every failure kind that aborts a request is a variant here; all of them
/// carry the underlying reason string so the user-facing error message stays
/// diagnosable. Status-message edit failures are deliberately NOT part of
/// this enum; they are logged and swallowed where they occur and never
/// abort the extraction (see `download::progress`).
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The selected profile needs a transcoding tool that is missing on the host
    #[error("audio extraction requires ffmpeg, which is not installed")]
    FeatureUnavailable,

    /// Engine-level failure: spawn error, bad exit status, metadata failure
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The expected output file is absent after a successful extraction
    #[error("downloaded file not found at expected path: {0}")]
    ArtifactMissing(String),

    /// The output file exists but is empty
    #[error("downloaded file is empty: {0}")]
    EmptyArtifact(String),

    /// The notification sink rejected the final file send
    #[error("failed to send file: {0}")]
    Delivery(String),

    /// Filesystem errors during validation or cleanup
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with DownloadError
pub type DownloadResult<T> = Result<T, DownloadError>;

impl DownloadError {
    /// Short tag for log lines and future metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DownloadError::FeatureUnavailable => "feature_unavailable",
            DownloadError::Extraction(_) => "extraction_failed",
            DownloadError::ArtifactMissing(_) => "artifact_missing",
            DownloadError::EmptyArtifact(_) => "empty_artifact",
            DownloadError::Delivery(_) => "delivery_failed",
            DownloadError::Io(_) => "io",
        }
    }
}
