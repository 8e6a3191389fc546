//! Background OCR worker
//!
//! Runs a recognition batch off the UI thread so the editor stays
//! responsive, bridging progress and the final result back over a channel.
//! The UI polls the channel in its update loop and performs the buffer
//! splice itself, reading the cursor at insertion time.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::error;

use crate::ocr::{run_batch, ProgressReporter, RecognitionService};
use crate::ui::messages::OcrUpdate;

/// Progress reporter that forwards updates over the worker channel
struct ChannelReporter {
    tx: Sender<OcrUpdate>,
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, message: &str) {
        let _ = self.tx.send(OcrUpdate::Progress(message.to_string()));
    }
}

/// Spawn a batch over `paths` on a background thread.
///
/// The service is shared with the app so the engine survives across batches.
/// Exactly one terminal message (`Completed` or `Failed`) arrives on the
/// returned channel.
pub fn spawn_batch(
    service: Arc<RecognitionService>,
    paths: Vec<PathBuf>,
    ctx: egui::Context,
) -> (Receiver<OcrUpdate>, JoinHandle<()>) {
    let (tx, rx) = unbounded();

    let handle = std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to build OCR runtime: {}", e);
                let _ = tx.send(OcrUpdate::Failed(e.to_string()));
                return;
            }
        };

        let reporter = ChannelReporter { tx: tx.clone() };
        let outcome = runtime.block_on(run_batch(&service, &paths, &reporter));

        let message = match outcome {
            Ok(result) => OcrUpdate::Completed(result),
            Err(err) => OcrUpdate::Failed(err.message),
        };
        let _ = tx.send(message);
        // Wake the UI so the result is picked up without user input.
        ctx.request_repaint();
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::engine::{EngineFactory, OcrEngine, ProgressFn};
    use crate::ocr::{EngineInitError, RecognitionError};
    use async_trait::async_trait;
    use std::path::Path;
    use std::time::Duration;

    struct EchoEngine;

    #[async_trait]
    impl OcrEngine for EchoEngine {
        async fn recognize(
            &self,
            path: &Path,
            _on_progress: ProgressFn<'_>,
        ) -> Result<String, RecognitionError> {
            Ok(format!("text from {}", path.display()))
        }
    }

    struct EchoFactory;

    #[async_trait]
    impl EngineFactory for EchoFactory {
        async fn create(&self) -> Result<Arc<dyn OcrEngine>, EngineInitError> {
            Ok(Arc::new(EchoEngine))
        }
    }

    #[test]
    fn test_worker_delivers_terminal_message() {
        let service = Arc::new(RecognitionService::new(Box::new(EchoFactory)));
        let ctx = egui::Context::default();
        let (rx, handle) = spawn_batch(service, vec![PathBuf::from("/imgs/a.png")], ctx);

        handle.join().unwrap();

        let mut completed = 0;
        while let Ok(update) = rx.recv_timeout(Duration::from_secs(1)) {
            if let OcrUpdate::Completed(result) = update {
                completed += 1;
                assert_eq!(result.outcomes.len(), 1);
                assert!(result.combined.contains("text from"));
            }
            if rx.is_empty() {
                break;
            }
        }
        assert_eq!(completed, 1);
    }
}
