//! Editor UI
//!
//! The eframe application shell: editor/preview split, toolbar, status bar,
//! dialogs, themes, and the channel plumbing to the OCR worker.

pub mod app;
pub mod dialogs;
pub mod messages;
pub mod theme;
pub mod worker;

pub use app::run_editor;
