//! Recognition engine backends
//!
//! The engine boundary is a small trait so the batch coordinator can be
//! tested without Tesseract installed. The production backend shells out to
//! the `tesseract` CLI, one image per invocation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::OcrSettings;
use crate::ocr::{EngineInitError, RecognitionError};

/// Callback for fractional recognition progress on a single image (0.0 - 1.0)
pub type ProgressFn<'a> = &'a (dyn Fn(f32) + Send + Sync);

/// A text recognition engine, invoked one image at a time.
///
/// Implementations are not assumed safe for concurrent recognition; callers
/// must serialize invocations.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Extract text from the image at `path`.
    ///
    /// `on_progress` receives fractional progress if the backend reports it;
    /// backends without progress reporting may never call it.
    async fn recognize(
        &self,
        path: &Path,
        on_progress: ProgressFn<'_>,
    ) -> Result<String, RecognitionError>;
}

/// Creates engine instances; the seam for injecting fakes in tests
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn OcrEngine>, EngineInitError>;
}

/// Recognition backend driving the `tesseract` CLI
pub struct TesseractEngine {
    binary: PathBuf,
    languages: String,
}

impl TesseractEngine {
    /// Probe the tesseract installation and build an engine.
    ///
    /// A missing or broken binary is an initialization failure, reported
    /// once for the whole batch.
    pub async fn initialize(
        binary: Option<PathBuf>,
        languages: &str,
    ) -> Result<Self, EngineInitError> {
        let binary = binary.unwrap_or_else(|| PathBuf::from("tesseract"));
        info!("Initializing Tesseract engine ({})", languages);

        let output = Command::new(&binary)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                EngineInitError::new(format!("cannot run {}: {}", binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(EngineInitError::new(format!(
                "{} --version exited with {}",
                binary.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        debug!(
            "Tesseract available: {}",
            version.lines().next().unwrap_or("unknown version")
        );

        Ok(Self {
            binary,
            languages: languages.to_string(),
        })
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        path: &Path,
        _on_progress: ProgressFn<'_>,
    ) -> Result<String, RecognitionError> {
        debug!("Recognizing {}", path.display());

        // `stdout` as the output base makes tesseract print the recognized
        // text instead of writing a file.
        let output = Command::new(&self.binary)
            .arg(path)
            .arg("stdout")
            .args(["-l", &self.languages])
            .output()
            .await
            .map_err(|e| RecognitionError::new(format!("failed to spawn tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("tesseract failed");
            return Err(RecognitionError::new(detail.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Factory for the production Tesseract backend
pub struct TesseractFactory {
    settings: OcrSettings,
}

impl TesseractFactory {
    pub fn new(settings: OcrSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl EngineFactory for TesseractFactory {
    async fn create(&self) -> Result<Arc<dyn OcrEngine>, EngineInitError> {
        let engine = TesseractEngine::initialize(
            self.settings.tesseract_binary.clone(),
            &self.settings.languages,
        )
        .await?;
        Ok(Arc::new(engine))
    }
}

/// Process-wide recognition service with an explicit lazy lifecycle.
///
/// The engine is created on first use and reused by every later batch.
/// A failed initialization leaves the slot empty so the next batch can
/// re-attempt it; a successful one is permanent for the process lifetime.
pub struct RecognitionService {
    factory: Box<dyn EngineFactory>,
    engine: tokio::sync::Mutex<Option<Arc<dyn OcrEngine>>>,
}

impl RecognitionService {
    pub fn new(factory: Box<dyn EngineFactory>) -> Self {
        Self {
            factory,
            engine: tokio::sync::Mutex::new(None),
        }
    }

    /// Service backed by the Tesseract CLI with the given settings
    pub fn tesseract(settings: OcrSettings) -> Self {
        Self::new(Box::new(TesseractFactory::new(settings)))
    }

    /// Get the engine, initializing it on first call
    pub async fn ensure_engine(&self) -> Result<Arc<dyn OcrEngine>, EngineInitError> {
        let mut slot = self.engine.lock().await;
        if let Some(engine) = slot.as_ref() {
            return Ok(engine.clone());
        }
        let engine = self.factory.create().await?;
        *slot = Some(engine.clone());
        Ok(engine)
    }

    /// Whether the engine has already been initialized
    pub async fn is_initialized(&self) -> bool {
        self.engine.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFactory {
        creations: Arc<AtomicUsize>,
        fail: bool,
    }

    struct NullEngine;

    #[async_trait]
    impl OcrEngine for NullEngine {
        async fn recognize(
            &self,
            _path: &Path,
            _on_progress: ProgressFn<'_>,
        ) -> Result<String, RecognitionError> {
            Ok(String::new())
        }
    }

    #[async_trait]
    impl EngineFactory for CountingFactory {
        async fn create(&self) -> Result<Arc<dyn OcrEngine>, EngineInitError> {
            self.creations.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(EngineInitError::new("probe failed"))
            } else {
                Ok(Arc::new(NullEngine))
            }
        }
    }

    #[tokio::test]
    async fn test_engine_created_once() {
        let creations = Arc::new(AtomicUsize::new(0));
        let service = RecognitionService::new(Box::new(CountingFactory {
            creations: creations.clone(),
            fail: false,
        }));

        service.ensure_engine().await.unwrap();
        service.ensure_engine().await.unwrap();

        assert_eq!(creations.load(Ordering::SeqCst), 1);
        assert!(service.is_initialized().await);
    }

    #[tokio::test]
    async fn test_failed_init_retried_on_next_use() {
        let creations = Arc::new(AtomicUsize::new(0));
        let service = RecognitionService::new(Box::new(CountingFactory {
            creations: creations.clone(),
            fail: true,
        }));

        assert!(service.ensure_engine().await.is_err());
        assert!(!service.is_initialized().await);
        assert!(service.ensure_engine().await.is_err());

        // Failure does not latch: each use re-attempts initialization.
        assert_eq!(creations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_binary_is_init_error() {
        let result = TesseractEngine::initialize(
            Some(PathBuf::from("/nonexistent/tesseract-binary")),
            "eng",
        )
        .await;
        assert!(result.is_err());
    }
}
