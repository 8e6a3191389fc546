//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest allowed editor font size
pub const MIN_FONT_SIZE: u32 = 8;
/// Largest allowed editor font size
pub const MAX_FONT_SIZE: u32 = 24;
/// Default editor font size
pub const DEFAULT_FONT_SIZE: u32 = 14;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Editor settings
    pub editor: EditorSettings,
    /// OCR settings
    pub ocr: OcrSettings,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Save the current file automatically in the background
    pub autosave_enabled: bool,
    /// Seconds between autosave checks
    pub autosave_interval_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            autosave_interval_secs: 60,
        }
    }
}

/// Editor appearance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Editor font size in points
    pub font_size: u32,
    /// Active color theme
    pub theme: ThemePreset,
    /// Editor pane share of the window width (0.2 - 0.8)
    pub split_ratio: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            theme: ThemePreset::Dark,
            split_ratio: 0.5,
        }
    }
}

impl EditorSettings {
    /// Bump the font size one step, clamped to the allowed range
    pub fn zoom_in(&mut self) {
        self.font_size = (self.font_size + 2).min(MAX_FONT_SIZE);
    }

    /// Shrink the font size one step, clamped to the allowed range
    pub fn zoom_out(&mut self) {
        self.font_size = self.font_size.saturating_sub(2).max(MIN_FONT_SIZE);
    }

    /// Reset the font size to the default
    pub fn zoom_reset(&mut self) {
        self.font_size = DEFAULT_FONT_SIZE;
    }

    /// Split ratio clamped to the usable range
    pub fn clamped_split_ratio(&self) -> f32 {
        self.split_ratio.clamp(0.2, 0.8)
    }

    /// Store a new split ratio, clamped; returns whether it actually moved
    pub fn set_split_ratio(&mut self, ratio: f32) -> bool {
        let ratio = ratio.clamp(0.2, 0.8);
        if (ratio - self.split_ratio).abs() < 0.005 {
            return false;
        }
        self.split_ratio = ratio;
        true
    }
}

/// Available color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreset {
    /// Dark theme (default)
    #[default]
    Dark,
    /// Light theme
    Light,
    /// Rainbow theme
    Rainbow,
    /// Gaming theme
    Gaming,
}

impl ThemePreset {
    /// All presets, in menu order
    pub const ALL: [ThemePreset; 4] = [
        ThemePreset::Dark,
        ThemePreset::Light,
        ThemePreset::Rainbow,
        ThemePreset::Gaming,
    ];

    /// Display name for menus
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Dark => "Dark",
            ThemePreset::Light => "Light",
            ThemePreset::Rainbow => "Rainbow",
            ThemePreset::Gaming => "Gaming",
        }
    }
}

/// OCR-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Tesseract language profile
    pub languages: String,
    /// Explicit path to the tesseract binary; `None` searches PATH
    pub tesseract_binary: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            // Simplified Chinese + English, matching the recognition the
            // editor was built around.
            languages: "chi_sim+eng".to_string(),
            tesseract_binary: None,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
