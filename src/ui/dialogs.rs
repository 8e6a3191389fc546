//! Modal dialogs: statistics, settings, shortcuts, about, and the fatal OCR
//! error box.

use egui::RichText;

use crate::config::AppConfig;
use crate::document::Document;
use crate::ui::theme::ThemePalette;

/// Which modal window is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Statistics,
    Settings,
    Shortcuts,
    About,
}

/// Document statistics dialog
pub fn show_statistics(
    ctx: &egui::Context,
    colors: &ThemePalette,
    document: &Document,
) -> bool {
    let mut open = true;
    let stats = document.stats();
    egui::Window::new("Document Statistics")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            egui::Grid::new("stats_grid").num_columns(2).show(ui, |ui| {
                ui.label("Characters:");
                ui.label(RichText::new(stats.chars.to_string()).strong());
                ui.end_row();
                ui.label("Words:");
                ui.label(RichText::new(stats.words.to_string()).strong());
                ui.end_row();
                ui.label("Lines:");
                ui.label(RichText::new(stats.lines.to_string()).strong());
                ui.end_row();
                ui.label("Paragraphs:");
                ui.label(RichText::new(stats.paragraphs.to_string()).strong());
                ui.end_row();
                ui.label("Checked at:");
                ui.label(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
                ui.end_row();
                ui.label("File:");
                match &document.path {
                    Some(path) => ui.label(path.display().to_string()),
                    None => ui.label(RichText::new("not saved").color(colors.text_muted)),
                };
                ui.end_row();
            });
        });
    open
}

/// Settings dialog; returns (still_open, changed)
pub fn show_settings(ctx: &egui::Context, config: &mut AppConfig) -> (bool, bool) {
    let mut open = true;
    let mut changed = false;
    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Autosave").size(16.0));
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Enabled:");
                if ui.checkbox(&mut config.general.autosave_enabled, "").changed() {
                    changed = true;
                }
            });
            ui.horizontal(|ui| {
                ui.label("Interval:");
                let mut secs = config.general.autosave_interval_secs as f32;
                if ui
                    .add(egui::Slider::new(&mut secs, 10.0..=300.0).suffix(" s"))
                    .changed()
                {
                    config.general.autosave_interval_secs = secs as u64;
                    changed = true;
                }
            });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);

            ui.heading(RichText::new("OCR").size(16.0));
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Languages:");
                if ui.text_edit_singleline(&mut config.ocr.languages).changed() {
                    changed = true;
                }
            });
            ui.label(
                RichText::new("Tesseract language profile, e.g. chi_sim+eng")
                    .size(12.0)
                    .weak(),
            );
        });
    (open, changed)
}

/// Keyboard shortcut reference dialog
pub fn show_shortcuts(ctx: &egui::Context, colors: &ThemePalette) -> bool {
    let mut open = true;
    egui::Window::new("Keyboard Shortcuts")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            let section = |ui: &mut egui::Ui, title: &str| {
                ui.add_space(8.0);
                ui.label(RichText::new(title).color(colors.accent_primary).strong());
            };
            let row = |ui: &mut egui::Ui, keys: &str, action: &str| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(keys).monospace());
                    ui.label(action);
                });
            };

            section(ui, "Files");
            row(ui, "Ctrl+O        ", "Open file");
            row(ui, "Ctrl+S        ", "Save file");
            row(ui, "Ctrl+Shift+S  ", "Save as");

            section(ui, "View");
            row(ui, "Ctrl+Plus     ", "Larger font");
            row(ui, "Ctrl+Minus    ", "Smaller font");
            row(ui, "Ctrl+0        ", "Reset font size");

            section(ui, "Markdown");
            row(ui, "# Heading     ", "Level-1 heading");
            row(ui, "**bold**      ", "Bold text");
            row(ui, "*italic*      ", "Italic text");
            row(ui, "`code`        ", "Inline code");
            row(ui, "[text](url)   ", "Link");
        });
    open
}

/// About dialog
pub fn show_about(ctx: &egui::Context, colors: &ThemePalette) -> bool {
    let mut open = true;
    egui::Window::new("About")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    RichText::new("Markdown Studio")
                        .size(22.0)
                        .color(colors.accent_secondary),
                );
                ui.add_space(8.0);
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(8.0);
                ui.label("Live preview · Themes · Statistics · Autosave · OCR insertion");
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Built with egui, pulldown-cmark, and Tesseract")
                        .size(12.0)
                        .weak(),
                );
            });
        });
    open
}

/// Fatal OCR error dialog (engine initialization failure)
pub fn show_ocr_error(ctx: &egui::Context, colors: &ThemePalette, message: &str) -> bool {
    let mut open = true;
    egui::Window::new("OCR Failed")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Recognition could not start:").color(colors.accent_error),
            );
            ui.add_space(4.0);
            ui.label(RichText::new(message).color(colors.accent_warning));
            ui.add_space(8.0);
            ui.label(
                RichText::new(
                    "Check that tesseract is installed and the configured \
                     language data (chi_sim, eng) is available.",
                )
                .size(12.0)
                .weak(),
            );
        });
    open
}
