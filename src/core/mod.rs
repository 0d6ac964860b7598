//! Core utilities: configuration, errors, logging, host feature probing.

pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod utils;

pub use error::{DownloadError, DownloadResult};
pub use features::FeatureAvailability;
pub use logging::init_logger;
