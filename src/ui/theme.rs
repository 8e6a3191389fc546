//! Themes and styling
//!
//! Color palettes for the four selectable themes and the egui style applied
//! from them.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

use crate::config::ThemePreset;

/// Color palette backing one theme preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    /// Whether the palette builds on egui's dark visuals
    pub dark_base: bool,

    // Background colors
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,
    pub bg_hover: Color32,

    // Accent colors
    pub accent_primary: Color32,
    pub accent_secondary: Color32,
    pub accent_success: Color32,
    pub accent_warning: Color32,
    pub accent_error: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Border and code block colors
    pub border: Color32,
    pub code_bg: Color32,
}

/// Dark theme, the default (Catppuccin-flavored, like the original editor)
pub const DARK: ThemePalette = ThemePalette {
    dark_base: true,
    bg_dark: Color32::from_rgb(30, 30, 46),
    bg_medium: Color32::from_rgb(36, 36, 54),
    bg_light: Color32::from_rgb(49, 50, 68),
    bg_hover: Color32::from_rgb(60, 61, 82),
    accent_primary: Color32::from_rgb(137, 180, 250),
    accent_secondary: Color32::from_rgb(203, 166, 247),
    accent_success: Color32::from_rgb(166, 227, 161),
    accent_warning: Color32::from_rgb(250, 179, 135),
    accent_error: Color32::from_rgb(243, 139, 168),
    text_primary: Color32::from_rgb(205, 214, 244),
    text_secondary: Color32::from_rgb(186, 194, 222),
    text_muted: Color32::from_rgb(127, 132, 156),
    border: Color32::from_rgb(69, 71, 90),
    code_bg: Color32::from_rgb(24, 24, 37),
};

/// Light theme
pub const LIGHT: ThemePalette = ThemePalette {
    dark_base: false,
    bg_dark: Color32::from_rgb(239, 241, 245),
    bg_medium: Color32::from_rgb(230, 233, 239),
    bg_light: Color32::from_rgb(220, 224, 232),
    bg_hover: Color32::from_rgb(204, 208, 218),
    accent_primary: Color32::from_rgb(30, 102, 245),
    accent_secondary: Color32::from_rgb(136, 57, 239),
    accent_success: Color32::from_rgb(64, 160, 43),
    accent_warning: Color32::from_rgb(254, 100, 11),
    accent_error: Color32::from_rgb(210, 15, 57),
    text_primary: Color32::from_rgb(76, 79, 105),
    text_secondary: Color32::from_rgb(92, 95, 119),
    text_muted: Color32::from_rgb(140, 143, 161),
    border: Color32::from_rgb(188, 192, 204),
    code_bg: Color32::from_rgb(220, 224, 232),
};

/// Rainbow theme: saturated accents on a deep background
pub const RAINBOW: ThemePalette = ThemePalette {
    dark_base: true,
    bg_dark: Color32::from_rgb(24, 16, 38),
    bg_medium: Color32::from_rgb(34, 22, 52),
    bg_light: Color32::from_rgb(46, 30, 68),
    bg_hover: Color32::from_rgb(60, 40, 88),
    accent_primary: Color32::from_rgb(255, 121, 198),
    accent_secondary: Color32::from_rgb(189, 147, 249),
    accent_success: Color32::from_rgb(80, 250, 123),
    accent_warning: Color32::from_rgb(255, 184, 108),
    accent_error: Color32::from_rgb(255, 85, 85),
    text_primary: Color32::from_rgb(248, 248, 242),
    text_secondary: Color32::from_rgb(200, 190, 220),
    text_muted: Color32::from_rgb(130, 120, 160),
    border: Color32::from_rgb(80, 60, 110),
    code_bg: Color32::from_rgb(18, 12, 30),
};

/// Gaming theme
pub const GAMING: ThemePalette = ThemePalette {
    dark_base: true,
    bg_dark: Color32::from_rgb(18, 18, 24),
    bg_medium: Color32::from_rgb(28, 28, 36),
    bg_light: Color32::from_rgb(38, 38, 48),
    bg_hover: Color32::from_rgb(48, 48, 60),
    accent_primary: Color32::from_rgb(88, 166, 255),
    accent_secondary: Color32::from_rgb(136, 87, 255),
    accent_success: Color32::from_rgb(46, 204, 113),
    accent_warning: Color32::from_rgb(255, 193, 7),
    accent_error: Color32::from_rgb(231, 76, 60),
    text_primary: Color32::from_rgb(240, 240, 245),
    text_secondary: Color32::from_rgb(160, 160, 175),
    text_muted: Color32::from_rgb(100, 100, 115),
    border: Color32::from_rgb(50, 50, 65),
    code_bg: Color32::from_rgb(12, 12, 16),
};

/// Palette for a preset
pub fn palette(preset: ThemePreset) -> &'static ThemePalette {
    match preset {
        ThemePreset::Dark => &DARK,
        ThemePreset::Light => &LIGHT,
        ThemePreset::Rainbow => &RAINBOW,
        ThemePreset::Gaming => &GAMING,
    }
}

/// Apply a theme preset to egui
pub fn apply_theme(ctx: &egui::Context, preset: ThemePreset, font_size: u32) {
    let colors = palette(preset);
    let mut style = (*ctx.style()).clone();

    let mut visuals = if colors.dark_base {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    // Window and panel backgrounds
    visuals.window_fill = colors.bg_medium;
    visuals.panel_fill = colors.bg_dark;
    visuals.faint_bg_color = colors.bg_light;
    visuals.extreme_bg_color = colors.code_bg;

    // Widget colors
    visuals.widgets.noninteractive.bg_fill = colors.bg_medium;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text_secondary);
    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);

    visuals.widgets.inactive.bg_fill = colors.bg_light;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);

    visuals.widgets.hovered.bg_fill = colors.bg_hover;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);

    visuals.widgets.active.bg_fill = colors.accent_primary;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.active.rounding = Rounding::same(6.0);

    visuals.widgets.open.bg_fill = colors.bg_hover;
    visuals.widgets.open.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.open.rounding = Rounding::same(6.0);

    // Selection and interaction
    visuals.selection.bg_fill = color_with_alpha(colors.accent_primary, 77);
    visuals.selection.stroke = Stroke::new(1.0, colors.accent_primary);

    // Hyperlinks
    visuals.hyperlink_color = colors.accent_primary;

    // Window appearance
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_shadow.blur = 8.0;
    visuals.window_stroke = Stroke::new(1.0, colors.border);

    // Popup and menu appearance
    visuals.popup_shadow.blur = 4.0;
    visuals.menu_rounding = Rounding::same(6.0);

    style.visuals = visuals;

    // Spacing
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(16.0);

    // Font sizes scale with the configured editor size
    let base = font_size as f32;
    style.text_styles = [
        (TextStyle::Small, FontId::new(base - 2.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(base, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(base, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(base, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(base + 8.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
