//! Host feature probing.
//!
//! The audio-only profile needs ffmpeg for transcoding. Whether the tool is
//! present is a process-wide fact: probed once at startup, then passed
//! explicitly to the prompt builder and the option resolver. It is never
//! read from ambient global state, so stale prompts can still be rejected
//! at resolve time.

use crate::core::config;
use std::process::Command;

/// Read-only record of which optional host tools are present.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAvailability {
    /// Whether ffmpeg is installed (gates the audio-only profile)
    pub ffmpeg: bool,
}

impl FeatureAvailability {
    /// Probe the host once. Call at startup, before the dispatcher runs.
    pub fn probe() -> Self {
        let ffmpeg = Command::new(&*config::FFMPEG_BIN)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);

        if ffmpeg {
            log::info!("ffmpeg found at '{}', audio-only profile enabled", &*config::FFMPEG_BIN);
        } else {
            log::warn!(
                "ffmpeg not found (looked for '{}'), audio-only profile disabled",
                &*config::FFMPEG_BIN
            );
        }

        Self { ffmpeg }
    }

    /// Construct a fixed availability value, mainly for tests.
    pub const fn with_ffmpeg(ffmpeg: bool) -> Self {
        Self { ffmpeg }
    }
}
