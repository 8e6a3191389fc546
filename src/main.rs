//! Markdown Studio - Desktop markdown editor with live preview
//!
//! A split-pane editor with GitHub-flavored markdown preview and batch
//! image-to-text insertion backed by a local Tesseract install.

mod config;
mod document;
mod ocr;
mod preview;
mod storage;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{AppConfig, ThemePreset};

/// Markdown Studio - markdown editor with live preview and OCR insertion
#[derive(Parser, Debug)]
#[command(name = "markdown-studio")]
#[command(about = "A desktop markdown editor with live preview and image text recognition")]
struct Args {
    /// Markdown file to open on startup
    file: Option<PathBuf>,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if args.list_themes {
        println!("Available themes:");
        for preset in ThemePreset::ALL {
            println!("  {}", preset.name());
        }
        return Ok(());
    }

    info!("Markdown Studio starting...");

    let (config, config_path) = load_or_create_config();

    if let Err(e) = ui::run_editor(config, config_path, args.file) {
        tracing::error!("Editor error: {}", e);
    }

    info!("Markdown Studio shutdown complete");

    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config() -> (AppConfig, Option<PathBuf>) {
    if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return (config, Some(config_path));
            }
        }
        info!("Using default configuration");
        return (AppConfig::default(), Some(config_path));
    }
    info!("Using default configuration");
    (AppConfig::default(), None)
}
