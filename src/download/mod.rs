//! Download orchestration: profiles, engine abstraction, progress, job runner.

pub mod engine;
pub mod options;
pub mod progress;
pub mod runner;
pub mod ytdlp;

pub use engine::{Extraction, ExtractionEngine, ProgressSample, SampleStatus};
pub use options::{DownloadProfile, ExtractionConfig, MediaKind, PostProcessing};
pub use runner::DownloadedArtifact;
