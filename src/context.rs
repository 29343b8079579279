//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::GeminiImageService;
use crate::adapters::recording::image_service::RecordingImageService;
use crate::adapters::replaying::image_service::ReplayingImageService;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::HeadshotError;
use crate::ports::ImageService;

/// Where recordings are written.
const CASSETTE_ROOT: &str = ".headshot/cassettes";

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image service port.
    pub service: Box<dyn ImageService>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// Call only after the recording service has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context. A missing API key surfaces when a request is submitted.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self { service: Box::new(GeminiImageService::new(config.gemini_key())) }
    }

    /// Create a recording context that wraps the live adapter with a recorder.
    #[must_use]
    pub fn recording(config: &Config) -> (Self, RecordingSession) {
        let live = Self::live(config);
        let recorder = Arc::new(Mutex::new(CassetteRecorder::start(
            Path::new(CASSETTE_ROOT),
            "image_service",
        )));
        let service = RecordingImageService::new(live.service, Arc::clone(&recorder));
        (Self { service: Box::new(service) }, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, HeadshotError> {
        let replayer = CassetteReplayer::load(path)
            .map_err(|e| HeadshotError::Config(format!("Failed to load cassette: {e}")))?;
        let service = ReplayingImageService::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { service: Box::new(service) })
    }
}
