//! Editor application
//!
//! Left pane holds the markdown source, right pane the rendered preview.
//! The OCR batch runs on a worker thread; this file owns the only place the
//! recognized text touches the buffer, so the cursor offset is read at
//! insertion time rather than when the batch started.

use crossbeam_channel::Receiver;
use egui::{Key, Modifiers, RichText, TextStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::config::{save_config, AppConfig, ThemePreset};
use crate::document::Document;
use crate::ocr::{supported_image_extensions, BatchResult, RecognitionService};
use crate::preview::PreviewContent;
use crate::storage;
use crate::ui::dialogs::{self, Modal};
use crate::ui::messages::OcrUpdate;
use crate::ui::theme;
use crate::ui::worker::spawn_batch;

/// Re-render the preview this long after the last keystroke
const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(500);
/// How long a toast notification stays visible
const NOTIFICATION_DURATION: Duration = Duration::from_secs(2);

/// Buffer preloaded into a fresh editor
const WELCOME_TEXT: &str = "\
# Welcome to Markdown Studio!

## Features

- **Themes**: four switchable color themes
- **Live preview**: rendered as you type
- **Statistics**: word and character counts in real time
- **OCR**: insert text recognized from images

## Quick start

1. Click **Open** to load a markdown file
2. Or start writing in the left-hand editor
3. The right-hand pane shows the rendered result
4. Use **Save** to keep your work

---

**Enjoy writing!**
";

/// The editor application
pub struct EditorApp {
    /// Application configuration
    config: AppConfig,
    /// Where the configuration is persisted, if a config dir exists
    config_path: Option<PathBuf>,
    /// The document being edited
    document: Document,
    /// Parsed preview blocks
    preview: PreviewContent,
    /// Set when the text changed since the preview was last parsed
    preview_stale: bool,
    /// Time of the last edit, for the preview debounce
    last_edit: Option<Instant>,
    /// Theme/font combination currently applied to the egui context
    applied_style: Option<(ThemePreset, u32)>,
    /// Process-wide recognition service, shared with worker threads
    service: Arc<RecognitionService>,
    /// Receiver for the running batch, if any
    ocr_rx: Option<Receiver<OcrUpdate>>,
    /// Worker thread handle for the running batch
    ocr_handle: Option<JoinHandle<()>>,
    /// Latest progress line from the worker
    ocr_status: Option<String>,
    /// Fatal engine-initialization message awaiting dismissal
    ocr_error: Option<String>,
    /// Splitter moved since the config was last persisted
    split_ratio_dirty: bool,
    /// Currently open modal dialog
    modal: Option<Modal>,
    /// Transient toast: message and creation time
    notification: Option<(String, Instant)>,
    /// Last successful save, for the autosave interval
    last_save: Instant,
}

impl EditorApp {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, file: Option<PathBuf>) -> Self {
        let mut document = Document::with_text(WELCOME_TEXT);
        if let Some(path) = file {
            match storage::read_document(&path) {
                Ok(content) => document.load(path, content),
                Err(e) => error!("Could not open {}: {}", path.display(), e),
            }
        }
        let preview = PreviewContent::parse(&document.text);

        let service = Arc::new(RecognitionService::tesseract(config.ocr.clone()));

        Self {
            config,
            config_path,
            document,
            preview,
            preview_stale: false,
            last_edit: None,
            applied_style: None,
            service,
            ocr_rx: None,
            ocr_handle: None,
            ocr_status: None,
            ocr_error: None,
            split_ratio_dirty: false,
            modal: None,
            notification: None,
            last_save: Instant::now(),
        }
    }

    /// eframe options for the editor window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1400.0, 900.0])
                .with_min_inner_size([800.0, 500.0])
                .with_title("Markdown Studio"),
            ..Default::default()
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some((message.into(), Instant::now()));
    }

    /// Write config back to disk, if a config directory was available
    fn persist_config(&self) {
        if let Some(path) = &self.config_path {
            if let Err(e) = save_config(&self.config, path) {
                error!("Failed to save configuration: {}", e);
            }
        }
    }

    fn open_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Markdown files", &["md", "markdown"])
            .add_filter("Text files", &["txt"])
            .add_filter("All files", &["*"])
            .pick_file();

        if let Some(path) = picked {
            match storage::read_document(&path) {
                Ok(content) => {
                    info!("Opened {}", path.display());
                    self.document.load(path, content);
                    self.reparse_preview();
                }
                Err(e) => self.notify(format!("Could not open file: {}", e)),
            }
        }
    }

    fn save_file(&mut self) {
        match self.document.path.clone() {
            Some(path) => self.write_to(path),
            None => self.save_file_as(),
        }
    }

    fn save_file_as(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Markdown files", &["md", "markdown"])
            .add_filter("Text files", &["txt"])
            .set_file_name("untitled.md")
            .save_file();

        if let Some(path) = picked {
            self.write_to(path);
        }
    }

    fn write_to(&mut self, path: PathBuf) {
        match storage::write_document(&path, &self.document.text) {
            Ok(()) => {
                self.document.path = Some(path);
                self.document.dirty = false;
                self.last_save = Instant::now();
                self.notify("File saved");
            }
            Err(e) => self.notify(format!("Could not save file: {}", e)),
        }
    }

    /// Silent background save when the interval has elapsed
    fn autosave_tick(&mut self) {
        if !self.config.general.autosave_enabled || !self.document.dirty {
            return;
        }
        let Some(path) = self.document.path.clone() else {
            return;
        };
        let interval = Duration::from_secs(self.config.general.autosave_interval_secs);
        if self.last_save.elapsed() < interval {
            return;
        }
        match storage::write_document(&path, &self.document.text) {
            Ok(()) => {
                self.document.dirty = false;
                self.last_save = Instant::now();
                self.notify("Autosaved");
            }
            Err(e) => error!("Autosave failed: {}", e),
        }
    }

    /// Pick images and launch a recognition batch on the worker thread
    fn start_ocr(&mut self, ctx: &egui::Context) {
        if self.ocr_rx.is_some() {
            self.notify("OCR already running");
            return;
        }
        let picked = rfd::FileDialog::new()
            .add_filter("Image files", supported_image_extensions())
            .add_filter("All files", &["*"])
            .pick_files();

        // Cancelled or empty selection: nothing changes.
        let Some(paths) = picked else { return };
        if paths.is_empty() {
            return;
        }

        info!("OCR requested for {} image(s)", paths.len());
        self.ocr_status = Some("preparing...".to_string());
        let (rx, handle) = spawn_batch(self.service.clone(), paths, ctx.clone());
        self.ocr_rx = Some(rx);
        self.ocr_handle = Some(handle);
    }

    /// Drain worker messages; on completion splice the combined text at the
    /// cursor position as it is now
    fn process_ocr_updates(&mut self) {
        let updates: Vec<OcrUpdate> = match &self.ocr_rx {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };

        for update in updates {
            match update {
                OcrUpdate::Progress(message) => {
                    self.ocr_status = Some(message);
                }
                OcrUpdate::Completed(result) => {
                    self.finish_ocr();
                    self.apply_batch(result);
                }
                OcrUpdate::Failed(message) => {
                    self.finish_ocr();
                    self.ocr_error = Some(message);
                }
            }
        }
    }

    fn finish_ocr(&mut self) {
        self.ocr_rx = None;
        self.ocr_status = None;
        if let Some(handle) = self.ocr_handle.take() {
            let _ = handle.join();
        }
    }

    fn apply_batch(&mut self, result: BatchResult) {
        if !result.has_content() {
            self.notify("No text was recognized");
            return;
        }
        // Cursor offset is read here, at insertion time, so text typed or
        // clicks made during the batch are respected.
        let cursor = self.document.cursor;
        self.document.splice_at(cursor, &result.combined);
        self.reparse_preview();
        self.notify("OCR text inserted");
    }

    fn reparse_preview(&mut self) {
        self.preview = PreviewContent::parse(&self.document.text);
        self.preview_stale = false;
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let mut zoom_changed = false;
        let (open, save, save_as, zoom_in, zoom_out, zoom_reset) = ctx.input_mut(|i| {
            (
                i.consume_key(Modifiers::COMMAND, Key::O),
                i.consume_key(Modifiers::COMMAND, Key::S),
                i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::S),
                i.consume_key(Modifiers::COMMAND, Key::Plus),
                i.consume_key(Modifiers::COMMAND, Key::Minus),
                i.consume_key(Modifiers::COMMAND, Key::Num0),
            )
        });

        if open {
            self.open_file();
        }
        if save_as {
            self.save_file_as();
        } else if save {
            self.save_file();
        }
        if zoom_in {
            self.config.editor.zoom_in();
            zoom_changed = true;
        }
        if zoom_out {
            self.config.editor.zoom_out();
            zoom_changed = true;
        }
        if zoom_reset {
            self.config.editor.zoom_reset();
            zoom_changed = true;
        }
        if zoom_changed {
            self.persist_config();
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("Open").clicked() {
                    self.open_file();
                }
                if ui.button("Save").clicked() {
                    self.save_file();
                }
                if ui.button("Save As").clicked() {
                    self.save_file_as();
                }

                ui.separator();

                ui.menu_button("Theme", |ui| {
                    for preset in ThemePreset::ALL {
                        if ui
                            .radio(self.config.editor.theme == preset, preset.name())
                            .clicked()
                        {
                            self.config.editor.theme = preset;
                            self.persist_config();
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("Tools", |ui| {
                    if ui.button("Insert from Image (OCR)...").clicked() {
                        ui.close_menu();
                        self.start_ocr(ctx);
                    }
                    ui.separator();
                    if ui.button("Statistics").clicked() {
                        ui.close_menu();
                        self.modal = Some(Modal::Statistics);
                    }
                    if ui.button("Settings").clicked() {
                        ui.close_menu();
                        self.modal = Some(Modal::Settings);
                    }
                    if ui
                        .checkbox(&mut self.config.general.autosave_enabled, "Autosave")
                        .changed()
                    {
                        self.persist_config();
                        self.notify(if self.config.general.autosave_enabled {
                            "Autosave enabled"
                        } else {
                            "Autosave disabled"
                        });
                    }
                    ui.separator();
                    if ui.button("Shortcuts").clicked() {
                        ui.close_menu();
                        self.modal = Some(Modal::Shortcuts);
                    }
                    if ui.button("About").clicked() {
                        ui.close_menu();
                        self.modal = Some(Modal::About);
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        let colors = theme::palette(self.config.editor.theme);
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let file_label = match &self.document.path {
                    Some(path) => path.display().to_string(),
                    None => "unsaved".to_string(),
                };
                let dirty_marker = if self.document.dirty { " *" } else { "" };
                ui.label(
                    RichText::new(format!("{}{}", file_label, dirty_marker))
                        .color(colors.text_secondary),
                );

                ui.separator();
                let stats = self.document.stats();
                ui.label(format!("words: {} | chars: {}", stats.words, stats.chars));

                if let Some(status) = &self.ocr_status {
                    ui.separator();
                    ui.label(RichText::new(status).color(colors.accent_warning));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(chrono::Local::now().format("%H:%M:%S").to_string())
                            .color(colors.text_muted),
                    );
                });
            });
        });
    }

    fn editor_and_preview(&mut self, ctx: &egui::Context) {
        let colors = *theme::palette(self.config.editor.theme);
        let base_size = self.config.editor.font_size as f32;

        let total_width = ctx.screen_rect().width();
        let editor_width = total_width * self.config.editor.clamped_split_ratio();

        let panel = egui::SidePanel::left("editor_panel")
            .resizable(true)
            .default_width(editor_width)
            .width_range(total_width * 0.2..=total_width * 0.8)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("editor_scroll")
                    .show(ui, |ui| {
                        let output = egui::TextEdit::multiline(&mut self.document.text)
                            .font(TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .desired_rows(40)
                            .show(ui);

                        if output.response.changed() {
                            self.document.dirty = true;
                            self.preview_stale = true;
                            self.last_edit = Some(Instant::now());
                        }
                        // Track the cursor whenever the widget reports one;
                        // the last known offset is the insertion point.
                        if let Some(range) = output.cursor_range {
                            self.document.cursor = range.primary.ccursor.index;
                        }
                    });
            });

        // Track the splitter as it is dragged, but only write the config
        // once the pointer is released.
        if total_width > 0.0 {
            let ratio = panel.response.rect.width() / total_width;
            if self.config.editor.set_split_ratio(ratio) {
                self.split_ratio_dirty = true;
            }
        }
        if self.split_ratio_dirty && !ctx.input(|i| i.pointer.any_down()) {
            self.split_ratio_dirty = false;
            self.persist_config();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("preview_scroll")
                .show(ui, |ui| {
                    if self.document.text.trim().is_empty() {
                        ui.add_space(48.0);
                        ui.vertical_centered(|ui| {
                            ui.heading(
                                RichText::new("Markdown Studio")
                                    .size(28.0)
                                    .color(colors.accent_primary),
                            );
                            ui.add_space(8.0);
                            ui.label(
                                RichText::new("Start writing in the editor on the left")
                                    .color(colors.accent_success),
                            );
                            ui.label(
                                RichText::new("The live preview appears here")
                                    .color(colors.accent_secondary),
                            );
                        });
                    } else {
                        self.preview.show(ui, &colors, base_size);
                    }
                });
        });
    }

    fn modals(&mut self, ctx: &egui::Context) {
        let colors = *theme::palette(self.config.editor.theme);

        if let Some(modal) = self.modal {
            let keep_open = match modal {
                Modal::Statistics => dialogs::show_statistics(ctx, &colors, &self.document),
                Modal::Settings => {
                    let (open, changed) = dialogs::show_settings(ctx, &mut self.config);
                    if changed {
                        self.persist_config();
                    }
                    open
                }
                Modal::Shortcuts => dialogs::show_shortcuts(ctx, &colors),
                Modal::About => dialogs::show_about(ctx, &colors),
            };
            if !keep_open {
                self.modal = None;
            }
        }

        if let Some(message) = self.ocr_error.clone() {
            if !dialogs::show_ocr_error(ctx, &colors, &message) {
                self.ocr_error = None;
            }
        }
    }

    fn toast(&mut self, ctx: &egui::Context) {
        let Some((message, created)) = self.notification.clone() else {
            return;
        };
        if created.elapsed() > NOTIFICATION_DURATION {
            self.notification = None;
            return;
        }
        let colors = theme::palette(self.config.editor.theme);
        egui::Area::new(egui::Id::new("notification_toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -40.0])
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(colors.bg_light)
                    .stroke(egui::Stroke::new(1.0, colors.accent_primary))
                    .rounding(egui::Rounding::same(6.0))
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(message).color(colors.text_primary));
                    });
            });
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Re-apply styling when the theme or font size changed
        let style = (self.config.editor.theme, self.config.editor.font_size);
        if self.applied_style != Some(style) {
            theme::apply_theme(ctx, style.0, style.1);
            self.applied_style = Some(style);
        }

        self.process_ocr_updates();
        self.autosave_tick();
        self.handle_shortcuts(ctx);

        // Debounced preview re-parse after the last keystroke
        if self.preview_stale {
            match self.last_edit {
                Some(at) if at.elapsed() >= PREVIEW_DEBOUNCE => self.reparse_preview(),
                _ => ctx.request_repaint_after(PREVIEW_DEBOUNCE),
            }
        }

        self.toolbar(ctx);
        self.status_bar(ctx);
        self.editor_and_preview(ctx);
        self.modals(ctx);
        self.toast(ctx);

        // Keep the status-bar clock ticking
        ctx.request_repaint_after(Duration::from_secs(1));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(handle) = self.ocr_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Run the editor (blocking)
pub fn run_editor(
    config: AppConfig,
    config_path: Option<PathBuf>,
    file: Option<PathBuf>,
) -> Result<(), eframe::Error> {
    let app = EditorApp::new(config, config_path, file);
    eframe::run_native(
        "Markdown Studio",
        EditorApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
