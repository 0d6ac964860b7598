//! Format-selection prompt: profile options, keyboard rendering, and the
//! callback payload encoding.

use crate::core::features::FeatureAvailability;
use crate::download::options::DownloadProfile;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

/// Notice shown alongside the prompt when the audio-only option is missing.
pub const FFMPEG_MISSING_NOTICE: &str = "Внимание: FFmpeg не установлен. Опция 'Только аудио' недоступна.";

/// Ordered list of selectable profiles for the current feature set.
///
/// Video options are always offered; audio-only is appended only when
/// ffmpeg is present. Pure function of its inputs.
pub fn profile_options(features: &FeatureAvailability) -> Vec<(&'static str, DownloadProfile)> {
    let mut options = vec![
        (DownloadProfile::VideoHigh.label(), DownloadProfile::VideoHigh),
        (DownloadProfile::VideoLow.label(), DownloadProfile::VideoLow),
    ];
    if features.ffmpeg {
        options.push((DownloadProfile::AudioOnly.label(), DownloadProfile::AudioOnly));
    }
    options
}

/// Explanatory notice for the caller to forward when an option is hidden.
pub fn missing_feature_notice(features: &FeatureAvailability) -> Option<&'static str> {
    if features.ffmpeg {
        None
    } else {
        Some(FFMPEG_MISSING_NOTICE)
    }
}

/// Encode a profile selection into a callback payload.
///
/// Format: `<tag>:<url>`, URL verbatim; it may itself contain colons.
pub fn encode_selection(profile: DownloadProfile, url: &Url) -> String {
    format!("{}:{}", profile.tag(), url)
}

/// Decode a callback payload back into (profile, raw URL).
///
/// The URL is everything after the first colon, untouched.
pub fn decode_selection(payload: &str) -> Option<(DownloadProfile, &str)> {
    let (tag, url) = payload.split_once(':')?;
    let profile = DownloadProfile::from_tag(tag)?;
    Some((profile, url))
}

/// Build the inline keyboard for the format prompt: the two video options on
/// one row, audio (when available) on its own row below.
pub fn format_keyboard(url: &Url, features: &FeatureAvailability) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();

    let options = profile_options(features);
    let (video, audio): (Vec<_>, Vec<_>) = options
        .into_iter()
        .partition(|(_, p)| !matches!(p, DownloadProfile::AudioOnly));

    rows.push(
        video
            .into_iter()
            .map(|(label, profile)| InlineKeyboardButton::callback(label.to_string(), encode_selection(profile, url)))
            .collect(),
    );

    if !audio.is_empty() {
        rows.push(
            audio
                .into_iter()
                .map(|(label, profile)| {
                    InlineKeyboardButton::callback(label.to_string(), encode_selection(profile, url))
                })
                .collect(),
        );
    }

    InlineKeyboardMarkup::new(rows)
}
