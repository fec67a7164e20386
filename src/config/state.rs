// Application state module
// Immutable configuration and capabilities shared by every request

use super::types::Config;
use crate::bfhl::{InferDetector, SignatureDetector};

/// Application state
pub struct AppState {
    pub config: Config,
    pub detector: Box<dyn SignatureDetector>,
}

impl AppState {
    /// Create `AppState` with the default signature detector
    pub fn new(config: Config) -> Self {
        Self::with_detector(config, Box::new(InferDetector))
    }

    pub fn with_detector(config: Config, detector: Box<dyn SignatureDetector>) -> Self {
        Self { config, detector }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
