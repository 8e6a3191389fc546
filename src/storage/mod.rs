//! Storage Layer
//!
//! Document and configuration persistence: plain UTF-8 files for documents,
//! platform config directory for settings.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "markdownstudio", "Markdown Studio")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Read a markdown document as UTF-8
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Write a markdown document as UTF-8
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");

        write_document(&path, "# Heading\n\n正文 body\n").unwrap();
        let content = read_document(&path).unwrap();

        assert_eq!(content, "# Heading\n\n正文 body\n");
    }

    #[test]
    fn test_read_missing_document() {
        let result = read_document(Path::new("/nonexistent/notes.md"));
        assert!(result.is_err());
    }
}
