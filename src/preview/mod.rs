//! Markdown Preview
//!
//! Parsing is delegated entirely to pulldown-cmark. `render_html` is the
//! pure text-to-HTML function; `panel` renders the same event stream as
//! egui widgets for the live preview pane.

pub mod panel;

pub use panel::PreviewContent;

use pulldown_cmark::{html, Options, Parser};

/// Parser options: GFM-style extensions the original editor enabled
pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Render markdown to HTML. Pure function, no side effects.
pub fn render_html(text: &str) -> String {
    let parser = Parser::new_ext(text, markdown_options());
    let mut out = String::with_capacity(text.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading() {
        let html = render_html("# Hello");
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_render_empty_is_empty() {
        assert_eq!(render_html(""), "");
    }

    #[test]
    fn test_render_gfm_table() {
        let html = render_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_render_strikethrough() {
        let html = render_html("~~gone~~");
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_render_code_block() {
        let html = render_html("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre><code"));
        assert!(html.contains("fn main() {}"));
    }
}
