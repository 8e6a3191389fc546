//! Editor Document
//!
//! The in-memory text buffer being edited: content, a char-based cursor
//! offset, the associated file path, and word-count statistics.

use std::path::PathBuf;

/// The live editor buffer plus cursor state
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Markdown source text
    pub text: String,
    /// Cursor offset in chars (egui cursors index chars, not bytes)
    pub cursor: usize,
    /// Path of the file backing this document, if any
    pub path: Option<PathBuf>,
    /// Whether the buffer has unsaved changes
    pub dirty: bool,
}

/// Word-count statistics over the trimmed document text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    /// Total characters
    pub chars: usize,
    /// Whitespace-separated words
    pub words: usize,
    /// Lines
    pub lines: usize,
    /// Blank-line-separated paragraphs
    pub paragraphs: usize,
}

impl Document {
    /// Create a document with initial content and no backing file
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Replace the buffer with content loaded from a file
    pub fn load(&mut self, path: PathBuf, content: String) {
        self.text = content;
        self.cursor = 0;
        self.path = Some(path);
        self.dirty = false;
    }

    /// Length of the buffer in chars
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert `block` at the given char offset as a single splice.
    ///
    /// The offset is clamped to the buffer length. Returns the char offset
    /// just past the inserted block so the caller can reposition the cursor.
    pub fn splice_at(&mut self, offset: usize, block: &str) -> usize {
        let offset = offset.min(self.char_len());
        let byte = byte_index_for_char(&self.text, offset);
        self.text.insert_str(byte, block);
        self.dirty = true;
        let new_cursor = offset + block.chars().count();
        self.cursor = new_cursor;
        new_cursor
    }

    /// Compute statistics the same way the status bar and the statistics
    /// dialog report them: over trimmed text, words split on whitespace,
    /// paragraphs split on blank lines.
    pub fn stats(&self) -> DocumentStats {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return DocumentStats {
                chars: 0,
                words: 0,
                lines: 0,
                paragraphs: 0,
            };
        }
        DocumentStats {
            chars: trimmed.chars().count(),
            words: trimmed.split_whitespace().count(),
            lines: trimmed.lines().count(),
            paragraphs: trimmed
                .split("\n\n")
                .filter(|p| !p.trim().is_empty())
                .count(),
        }
    }
}

/// Byte index of the given char offset; callers must pre-clamp the offset
fn byte_index_for_char(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_between_prefix_and_suffix() {
        let mut doc = Document::with_text("AB");
        let cursor = doc.splice_at(1, "X");
        assert_eq!(doc.text, "AXB");
        assert_eq!(cursor, 2);
        assert!(doc.dirty);
    }

    #[test]
    fn test_splice_at_start_and_end() {
        let mut doc = Document::with_text("mid");
        doc.splice_at(0, ">");
        assert_eq!(doc.text, ">mid");
        doc.splice_at(doc.char_len(), "<");
        assert_eq!(doc.text, ">mid<");
    }

    #[test]
    fn test_splice_offset_clamped() {
        let mut doc = Document::with_text("ab");
        doc.splice_at(99, "c");
        assert_eq!(doc.text, "abc");
    }

    #[test]
    fn test_splice_with_multibyte_chars() {
        let mut doc = Document::with_text("日本語");
        let cursor = doc.splice_at(1, "中文");
        assert_eq!(doc.text, "日中文本語");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_stats_empty_document() {
        let doc = Document::default();
        let stats = doc.stats();
        assert_eq!(stats.chars, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.paragraphs, 0);
    }

    #[test]
    fn test_stats_counts() {
        let doc = Document::with_text("# Title\n\nfirst paragraph here\n\nsecond one\n");
        let stats = doc.stats();
        assert_eq!(stats.words, 7);
        assert_eq!(stats.lines, 5);
        assert_eq!(stats.paragraphs, 3);
    }

    #[test]
    fn test_stats_whitespace_only_is_empty() {
        let doc = Document::with_text("   \n\n  \t ");
        assert_eq!(doc.stats().words, 0);
    }

    #[test]
    fn test_load_resets_cursor_and_dirty() {
        let mut doc = Document::with_text("old");
        doc.cursor = 3;
        doc.dirty = true;
        doc.load(PathBuf::from("/tmp/notes.md"), "new content".to_string());
        assert_eq!(doc.cursor, 0);
        assert!(!doc.dirty);
        assert_eq!(doc.path.as_deref(), Some(std::path::Path::new("/tmp/notes.md")));
    }
}
