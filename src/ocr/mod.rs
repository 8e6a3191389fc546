//! OCR Layer
//!
//! Text recognition for the image-insertion workflow. The recognition engine
//! itself is external (Tesseract, driven as a subprocess); this module owns
//! its lifecycle and the batch orchestration around it.

pub mod batch;
pub mod engine;

pub use batch::{run_batch, supported_image_extensions, BatchResult, ProgressReporter};
pub use engine::RecognitionService;

use thiserror::Error;

/// Fatal failure to bring up the recognition engine.
///
/// Aborts the whole batch before any image is processed; surfaced to the user
/// as a single error dialog.
#[derive(Debug, Clone, Error)]
#[error("failed to initialize recognition engine: {message}")]
pub struct EngineInitError {
    /// Human-readable cause
    pub message: String,
}

impl EngineInitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Per-image recognition failure.
///
/// Recovered locally: recorded in the image's outcome and downgraded to an
/// inline annotation in the combined output, the batch continues.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RecognitionError {
    /// Human-readable cause
    pub message: String,
}

impl RecognitionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
