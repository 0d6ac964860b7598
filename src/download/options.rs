//! Download profiles and their mapping to extraction configurations.

use crate::core::config;
use crate::core::error::DownloadError;
use crate::core::features::FeatureAvailability;

/// User-selected download intent, chosen once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadProfile {
    /// Best available video+audio streams, MP4 container
    VideoHigh,
    /// Worst available video+audio streams, MP4 container
    VideoLow,
    /// Best available audio stream, extracted to MP3 (requires ffmpeg)
    AudioOnly,
}

/// Classification of the produced artifact, drives the delivery method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl DownloadProfile {
    /// Wire tag used in callback payloads.
    pub fn tag(&self) -> &'static str {
        match self {
            DownloadProfile::VideoHigh => "video_high",
            DownloadProfile::VideoLow => "video_low",
            DownloadProfile::AudioOnly => "audio",
        }
    }

    /// Parse a wire tag back into a profile.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "video_high" => Some(DownloadProfile::VideoHigh),
            "video_low" => Some(DownloadProfile::VideoLow),
            "audio" => Some(DownloadProfile::AudioOnly),
            _ => None,
        }
    }

    /// Button label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            DownloadProfile::VideoHigh => "Видео (Высокое качество)",
            DownloadProfile::VideoLow => "Видео (Низкое качество)",
            DownloadProfile::AudioOnly => "Только аудио",
        }
    }

    /// The kind of artifact this profile produces.
    pub fn kind(&self) -> MediaKind {
        match self {
            DownloadProfile::VideoHigh | DownloadProfile::VideoLow => MediaKind::Video,
            DownloadProfile::AudioOnly => MediaKind::Audio,
        }
    }
}

/// One post-processing step applied by the extraction engine after download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessing {
    /// Normalize the container to MP4
    RecodeMp4,
    /// Extract the audio track and encode it to a fixed codec/quality
    ExtractAudio {
        codec: &'static str,
        quality: &'static str,
    },
}

/// Concrete extraction configuration derived from a profile.
///
/// `AudioOnly` configurations are only constructible while ffmpeg is
/// available; `resolve` re-checks availability even though the prompt
/// already filtered the option, because a stale keyboard can still deliver
/// the callback.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    profile: DownloadProfile,
    /// yt-dlp format selection expression
    pub format_selector: &'static str,
    /// Ordered post-processing steps
    pub postprocessing: Vec<PostProcessing>,
}

impl ExtractionConfig {
    /// Map a profile to its extraction configuration.
    ///
    /// Fails with `FeatureUnavailable` for `AudioOnly` when ffmpeg is
    /// missing: an error, never a silently degraded config.
    pub fn resolve(profile: DownloadProfile, features: &FeatureAvailability) -> Result<Self, DownloadError> {
        match profile {
            DownloadProfile::VideoHigh => Ok(Self {
                profile,
                format_selector: "bestvideo+bestaudio/best",
                postprocessing: vec![PostProcessing::RecodeMp4],
            }),
            DownloadProfile::VideoLow => Ok(Self {
                profile,
                format_selector: "worstvideo+worstaudio/worst",
                postprocessing: vec![PostProcessing::RecodeMp4],
            }),
            DownloadProfile::AudioOnly => {
                if !features.ffmpeg {
                    return Err(DownloadError::FeatureUnavailable);
                }
                Ok(Self {
                    profile,
                    format_selector: "bestaudio/best",
                    postprocessing: vec![PostProcessing::ExtractAudio {
                        codec: config::audio::CODEC,
                        quality: config::audio::QUALITY,
                    }],
                })
            }
        }
    }

    /// The profile this configuration was resolved from.
    pub fn profile(&self) -> DownloadProfile {
        self.profile
    }

    /// The kind of artifact this configuration produces.
    pub fn kind(&self) -> MediaKind {
        self.profile.kind()
    }

    /// File extension of the final artifact.
    pub fn output_extension(&self) -> &'static str {
        match self.kind() {
            MediaKind::Video => "mp4",
            MediaKind::Audio => config::audio::CODEC,
        }
    }
}
