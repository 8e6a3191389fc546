//! Message types for communication between the OCR worker and the editor UI

use crate::ocr::BatchResult;

/// Messages sent from the OCR worker thread to the editor
#[derive(Debug, Clone)]
pub enum OcrUpdate {
    /// Human-readable progress text for the status line
    Progress(String),
    /// The batch ran to completion (individual images may still have failed)
    Completed(BatchResult),
    /// Engine initialization failed; the batch was aborted
    Failed(String),
}
