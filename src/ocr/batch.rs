//! OCR batch coordinator
//!
//! Runs one user-initiated recognition request over an ordered set of image
//! files: initializes the engine lazily, recognizes strictly sequentially,
//! records one outcome per image regardless of failures, and assembles the
//! combined text block that gets spliced into the editor.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::ocr::{EngineInitError, RecognitionService};

/// Separator between formatted sections in the combined output
const SECTION_SEPARATOR: &str = "\n---\n";

/// One image queued for recognition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    /// Absolute path to the image file
    pub path: PathBuf,
    /// Zero-based position in the batch
    pub index: usize,
    /// Batch size
    pub total: usize,
}

impl ImageJob {
    /// One-based ordinal used in progress text and section headings
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    /// File base name for the section heading
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Result of recognizing a single image
#[derive(Debug, Clone)]
pub struct RecognitionOutcome {
    /// The job this outcome belongs to
    pub job: ImageJob,
    /// Trimmed recognized text; empty when nothing was extracted or on failure
    pub text: String,
    /// Whether recognition failed for this image
    pub failed: bool,
    /// Failure detail when `failed`
    pub error_message: Option<String>,
}

/// Result of a whole batch: one outcome per input image, plus the combined
/// text block ready for insertion
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Per-image outcomes, in input order
    pub outcomes: Vec<RecognitionOutcome>,
    /// Non-empty sections joined with a separator; empty when nothing was
    /// recognized anywhere
    pub combined: String,
}

impl BatchResult {
    /// Whether any image produced text (or a failure annotation) to insert
    pub fn has_content(&self) -> bool {
        !self.combined.is_empty()
    }
}

/// Sink for human-readable progress updates during a batch.
///
/// Fire-and-forget; implementations must not fail. The UI forwards these to
/// the status line, tests record them.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Run recognition over `paths` in order.
///
/// Only engine initialization failure escapes as an error; per-image
/// failures are absorbed into their outcome and the batch continues. Images
/// are processed one at a time because the engine is not assumed safe for
/// concurrent use.
pub async fn run_batch(
    service: &RecognitionService,
    paths: &[PathBuf],
    progress: &dyn ProgressReporter,
) -> Result<BatchResult, EngineInitError> {
    if paths.is_empty() {
        return Ok(BatchResult::default());
    }

    if !service.is_initialized().await {
        progress.report("initializing recognition engine...");
    }
    let engine = service.ensure_engine().await?;

    let total = paths.len();
    info!("OCR batch started: {} image(s)", total);

    let mut outcomes = Vec::with_capacity(total);
    let mut sections = Vec::new();

    for (index, path) in paths.iter().enumerate() {
        let job = ImageJob {
            path: path.clone(),
            index,
            total,
        };
        progress.report(&format!("processing image {} of {}", job.ordinal(), total));

        let on_progress = |fraction: f32| {
            let percent = (fraction * 100.0).round() as u32;
            progress.report(&format!("recognizing: {}%", percent));
        };

        match engine.recognize(path, &on_progress).await {
            Ok(raw) => {
                let text = raw.trim().to_string();
                if !text.is_empty() {
                    sections.push(format_section(&job, &text));
                }
                outcomes.push(RecognitionOutcome {
                    job,
                    text,
                    failed: false,
                    error_message: None,
                });
            }
            Err(err) => {
                warn!("Recognition failed for {}: {}", path.display(), err);
                let annotation = format!("[recognition failed: {}]", err.message);
                sections.push(format_section(&job, &annotation));
                outcomes.push(RecognitionOutcome {
                    job,
                    text: String::new(),
                    failed: true,
                    error_message: Some(err.message.clone()),
                });
            }
        }
    }

    let combined = sections.join(SECTION_SEPARATOR);
    info!(
        "OCR batch finished: {}/{} image(s) yielded text",
        outcomes.iter().filter(|o| !o.failed && !o.text.is_empty()).count(),
        total
    );

    Ok(BatchResult { outcomes, combined })
}

/// One labeled block of output text for one image
fn format_section(job: &ImageJob, body: &str) -> String {
    format!("\n### Image {}: {}\n\n{}\n", job.ordinal(), job.base_name(), body)
}

/// Convenience for selecting image files: extensions the OCR dialog accepts
pub fn supported_image_extensions() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "bmp", "gif"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::engine::{EngineFactory, OcrEngine, ProgressFn};
    use crate::ocr::RecognitionError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Engine that replays per-path scripted outcomes
    struct ScriptedEngine {
        script: HashMap<String, Result<String, String>>,
        report_fraction: Option<f32>,
    }

    #[async_trait]
    impl OcrEngine for ScriptedEngine {
        async fn recognize(
            &self,
            path: &Path,
            on_progress: ProgressFn<'_>,
        ) -> Result<String, RecognitionError> {
            if let Some(fraction) = self.report_fraction {
                on_progress(fraction);
            }
            let key = path.file_name().unwrap().to_string_lossy().into_owned();
            match self.script.get(&key) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(RecognitionError::new(message.clone())),
                None => Ok(String::new()),
            }
        }
    }

    struct ScriptedFactory {
        engine: Mutex<Option<ScriptedEngine>>,
        creations: AtomicUsize,
        fail_init: bool,
    }

    #[async_trait]
    impl EngineFactory for ScriptedFactory {
        async fn create(&self) -> Result<Arc<dyn OcrEngine>, crate::ocr::EngineInitError> {
            self.creations.fetch_add(1, Ordering::SeqCst);
            if self.fail_init {
                return Err(crate::ocr::EngineInitError::new("no language data"));
            }
            let engine = self.engine.lock().unwrap().take().expect("engine consumed twice");
            Ok(Arc::new(engine))
        }
    }

    /// Progress reporter that records every message
    #[derive(Default)]
    struct RecordingReporter {
        messages: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    impl RecordingReporter {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    fn service_with(
        script: Vec<(&str, Result<&str, &str>)>,
        report_fraction: Option<f32>,
    ) -> RecognitionService {
        let script = script
            .into_iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    v.map(|s| s.to_string()).map_err(|s| s.to_string()),
                )
            })
            .collect();
        RecognitionService::new(Box::new(ScriptedFactory {
            engine: Mutex::new(Some(ScriptedEngine {
                script,
                report_fraction,
            })),
            creations: AtomicUsize::new(0),
            fail_init: false,
        }))
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/imgs/{}", n))).collect()
    }

    #[tokio::test]
    async fn test_one_outcome_per_input_in_order() {
        let service = service_with(
            vec![("a.png", Ok("alpha")), ("b.png", Ok("")), ("c.png", Err("boom"))],
            None,
        );
        let reporter = RecordingReporter::default();
        let result = run_batch(&service, &paths(&["a.png", "b.png", "c.png"]), &reporter)
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 3);
        for (i, outcome) in result.outcomes.iter().enumerate() {
            assert_eq!(outcome.job.index, i);
            assert_eq!(outcome.job.total, 3);
        }
        assert!(!result.outcomes[0].failed);
        assert!(!result.outcomes[1].failed);
        assert!(result.outcomes[2].failed);
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let service = service_with(vec![], None);
        let reporter = RecordingReporter::default();
        let result = run_batch(&service, &[], &reporter).await.unwrap();

        assert!(result.outcomes.is_empty());
        assert!(!result.has_content());
        // No engine init, no progress chatter.
        assert!(reporter.messages().is_empty());
        assert!(!service.is_initialized().await);
    }

    #[tokio::test]
    async fn test_sections_in_input_order_with_separator() {
        let service = service_with(
            vec![("one.png", Ok("first")), ("two.png", Ok("second"))],
            None,
        );
        let reporter = RecordingReporter::default();
        let result = run_batch(&service, &paths(&["one.png", "two.png"]), &reporter)
            .await
            .unwrap();

        let first = result.combined.find("### Image 1: one.png").unwrap();
        let second = result.combined.find("### Image 2: two.png").unwrap();
        assert!(first < second);
        assert!(result.combined.contains("\n---\n"));
        assert!(result.combined.contains("first"));
        assert!(result.combined.contains("second"));
    }

    #[tokio::test]
    async fn test_empty_text_omitted_but_outcome_recorded() {
        let service = service_with(
            vec![("blank.png", Ok("   \n  ")), ("real.png", Ok("words"))],
            None,
        );
        let reporter = RecordingReporter::default();
        let result = run_batch(&service, &paths(&["blank.png", "real.png"]), &reporter)
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[0].text, "");
        assert!(!result.combined.contains("blank.png"));
        assert!(result.combined.contains("real.png"));
        assert!(!result.combined.contains("\n---\n"));
    }

    #[tokio::test]
    async fn test_all_empty_yields_no_content() {
        let service = service_with(vec![("a.png", Ok("")), ("b.png", Ok("\n \t"))], None);
        let reporter = RecordingReporter::default();
        let result = run_batch(&service, &paths(&["a.png", "b.png"]), &reporter)
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert!(!result.has_content());
        assert!(result.combined.is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let service = service_with(
            vec![("hello.png", Ok("Hello")), ("bad.png", Err("timeout"))],
            None,
        );
        let reporter = RecordingReporter::default();
        let result = run_batch(&service, &paths(&["hello.png", "bad.png"]), &reporter)
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[1].error_message.as_deref(), Some("timeout"));

        let hello = result.combined.find("Hello").unwrap();
        let failed = result
            .combined
            .find("[recognition failed: timeout]")
            .unwrap();
        assert!(hello < failed);
    }

    #[tokio::test]
    async fn test_init_failure_aborts_batch() {
        let service = RecognitionService::new(Box::new(ScriptedFactory {
            engine: Mutex::new(None),
            creations: AtomicUsize::new(0),
            fail_init: true,
        }));
        let reporter = RecordingReporter::default();
        let err = run_batch(&service, &paths(&["a.png"]), &reporter)
            .await
            .unwrap_err();

        assert!(err.message.contains("no language data"));
        // Nothing processed, nothing to insert.
        assert!(!service.is_initialized().await);
    }

    #[tokio::test]
    async fn test_progress_messages() {
        let service = service_with(
            vec![("a.png", Ok("x")), ("b.png", Ok("y"))],
            Some(0.5),
        );
        let reporter = RecordingReporter::default();
        run_batch(&service, &paths(&["a.png", "b.png"]), &reporter)
            .await
            .unwrap();

        let messages = reporter.messages();
        assert!(messages.contains(&"initializing recognition engine...".to_string()));
        assert!(messages.contains(&"processing image 1 of 2".to_string()));
        assert!(messages.contains(&"processing image 2 of 2".to_string()));
        assert!(messages.contains(&"recognizing: 50%".to_string()));
    }

    #[tokio::test]
    async fn test_engine_reused_across_batches() {
        let factory = ScriptedFactory {
            engine: Mutex::new(Some(ScriptedEngine {
                script: HashMap::new(),
                report_fraction: None,
            })),
            creations: AtomicUsize::new(0),
            fail_init: false,
        };
        let service = RecognitionService::new(Box::new(factory));
        let reporter = RecordingReporter::default();

        run_batch(&service, &paths(&["a.png"]), &reporter).await.unwrap();
        run_batch(&service, &paths(&["b.png"]), &reporter).await.unwrap();

        // Second batch reuses the live engine; "consumed twice" would panic
        // inside the factory if it were re-created.
        assert!(service.is_initialized().await);
    }

    #[test]
    fn test_section_format() {
        let job = ImageJob {
            path: PathBuf::from("/pics/受付.png"),
            index: 4,
            total: 9,
        };
        let section = format_section(&job, "body text");
        assert_eq!(section, "\n### Image 5: 受付.png\n\nbody text\n");
    }
}
