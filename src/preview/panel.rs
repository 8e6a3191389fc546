//! Live preview pane
//!
//! Walks the pulldown-cmark event stream into a flat list of styled blocks
//! and renders them as egui widgets. Parsed once per (debounced) edit, drawn
//! every frame.

use egui::text::LayoutJob;
use egui::{Color32, FontFamily, FontId, RichText, Stroke, TextFormat};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::preview::markdown_options;
use crate::ui::theme::ThemePalette;

/// One styled run of inline text
#[derive(Debug, Clone, Default, PartialEq)]
struct Span {
    text: String,
    strong: bool,
    emphasis: bool,
    code: bool,
    strikethrough: bool,
    link: bool,
}

/// Inline content of a block
#[derive(Debug, Clone, Default, PartialEq)]
struct Inline {
    spans: Vec<Span>,
}

impl Inline {
    fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One renderable block
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Heading(u8, Inline),
    Paragraph(Inline),
    CodeBlock(String),
    ListItem { depth: usize, marker: String, content: Inline },
    Quote(Inline),
    TableRow { header: bool, cells: Vec<Inline> },
    Rule,
}

/// Parsed preview content, cached between edits
#[derive(Debug, Clone, Default)]
pub struct PreviewContent {
    blocks: Vec<Block>,
}

impl PreviewContent {
    /// Parse markdown into renderable blocks
    pub fn parse(text: &str) -> Self {
        let mut builder = Builder::default();
        for event in Parser::new_ext(text, markdown_options()) {
            builder.event(event);
        }
        builder.finish();
        Self {
            blocks: builder.blocks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Draw the blocks into the preview pane
    pub fn show(&self, ui: &mut egui::Ui, colors: &ThemePalette, base_size: f32) {
        for block in &self.blocks {
            match block {
                Block::Heading(level, inline) => {
                    let (size, color) = match level {
                        1 => (base_size + 10.0, colors.accent_primary),
                        2 => (base_size + 6.0, colors.accent_secondary),
                        3 => (base_size + 4.0, colors.text_primary),
                        _ => (base_size + 2.0, colors.text_primary),
                    };
                    ui.add_space(6.0);
                    ui.label(inline_job(inline, size, colors, true).with_color(color));
                    if *level <= 2 {
                        ui.separator();
                    }
                }
                Block::Paragraph(inline) => {
                    ui.add_space(2.0);
                    ui.label(inline_job(inline, base_size, colors, false));
                }
                Block::CodeBlock(code) => {
                    ui.add_space(2.0);
                    egui::Frame::none()
                        .fill(colors.code_bg)
                        .rounding(egui::Rounding::same(6.0))
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(code.trim_end())
                                    .monospace()
                                    .size(base_size)
                                    .color(colors.accent_success),
                            );
                        });
                }
                Block::ListItem {
                    depth,
                    marker,
                    content,
                } => {
                    ui.horizontal_wrapped(|ui| {
                        ui.add_space(16.0 * (*depth as f32 + 1.0));
                        ui.label(
                            RichText::new(marker)
                                .size(base_size)
                                .color(colors.accent_primary),
                        );
                        ui.label(inline_job(content, base_size, colors, false));
                    });
                }
                Block::Quote(inline) => {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            RichText::new("┃")
                                .size(base_size + 2.0)
                                .color(colors.accent_warning),
                        );
                        ui.label(
                            inline_job(inline, base_size, colors, false)
                                .with_color(colors.text_secondary),
                        );
                    });
                }
                Block::TableRow { header, cells } => {
                    ui.horizontal_wrapped(|ui| {
                        for (i, cell) in cells.iter().enumerate() {
                            if i > 0 {
                                ui.label(
                                    RichText::new("|").color(colors.text_muted).size(base_size),
                                );
                            }
                            let job = inline_job(cell, base_size, colors, *header);
                            ui.label(job);
                        }
                    });
                }
                Block::Rule => {
                    ui.add_space(4.0);
                    ui.separator();
                    ui.add_space(4.0);
                }
            }
        }
    }
}

/// Helper extension: recolor every section of a finished job
trait JobExt {
    fn with_color(self, color: Color32) -> Self;
}

impl JobExt for LayoutJob {
    fn with_color(mut self, color: Color32) -> Self {
        for section in &mut self.sections {
            section.format.color = color;
        }
        self
    }
}

/// Build a wrapped layout job from inline spans
fn inline_job(inline: &Inline, size: f32, colors: &ThemePalette, strong_all: bool) -> LayoutJob {
    let mut job = LayoutJob::default();
    let strong_color = if colors.dark_base {
        Color32::WHITE
    } else {
        Color32::BLACK
    };

    for span in &inline.spans {
        if span.text.is_empty() {
            continue;
        }
        let font_id = if span.code {
            FontId::new(size, FontFamily::Monospace)
        } else {
            FontId::new(size, FontFamily::Proportional)
        };
        let color = if span.link {
            colors.accent_primary
        } else if span.strong || strong_all {
            strong_color
        } else {
            colors.text_primary
        };
        let format = TextFormat {
            font_id,
            color,
            background: if span.code {
                colors.code_bg
            } else {
                Color32::TRANSPARENT
            },
            italics: span.emphasis,
            underline: if span.link {
                Stroke::new(1.0, colors.accent_primary)
            } else {
                Stroke::NONE
            },
            strikethrough: if span.strikethrough {
                Stroke::new(1.0, colors.text_muted)
            } else {
                Stroke::NONE
            },
            ..Default::default()
        };
        job.append(&span.text, 0.0, format);
    }
    job
}

/// Event-stream walker accumulating blocks
#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    current: Inline,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    link: usize,
    // Block context
    heading: Option<u8>,
    quote_depth: usize,
    code_block: Option<String>,
    // Ordered-list counters; None for bullet lists
    list_stack: Vec<Option<u64>>,
    in_item: bool,
    item_marker: String,
    // Tables
    table_cells: Option<Vec<Inline>>,
    table_header: bool,
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(code) = self.code_block.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                self.current.spans.push(Span {
                    text: code.into_string(),
                    code: true,
                    strong: self.strong > 0,
                    emphasis: self.emphasis > 0,
                    strikethrough: self.strikethrough > 0,
                    link: self.link > 0,
                });
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_text("\n"),
            Event::Rule => {
                self.flush_paragraph();
                self.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                self.item_marker = if checked { "[x]" } else { "[ ]" }.to_string();
            }
            Event::FootnoteReference(name) => {
                self.push_text(&format!("[^{}]", name));
            }
            // Raw HTML is not interpreted in the widget preview
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_paragraph();
                self.heading = Some(heading_rank(level));
            }
            Tag::Paragraph => {}
            Tag::BlockQuote(_) => {
                self.flush_paragraph();
                self.quote_depth += 1;
            }
            // Language tag is ignored; there is no highlighter in the pane.
            Tag::CodeBlock(_) => {
                self.flush_paragraph();
                self.code_block = Some(String::new());
            }
            Tag::List(start) => {
                self.flush_paragraph();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_paragraph();
                self.in_item = true;
                self.item_marker = match self.list_stack.last_mut() {
                    Some(Some(counter)) => {
                        let marker = format!("{}.", counter);
                        *counter += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { .. } => self.link += 1,
            Tag::Image { .. } => self.push_text("🖼 "),
            Tag::Table(_) => self.flush_paragraph(),
            Tag::TableHead => {
                self.table_header = true;
                self.table_cells = Some(Vec::new());
            }
            Tag::TableRow => {
                self.table_cells = Some(Vec::new());
            }
            Tag::TableCell => {}
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                let level = self.heading.take().unwrap_or(1);
                let inline = std::mem::take(&mut self.current);
                if !inline.is_empty() {
                    self.blocks.push(Block::Heading(level, inline));
                }
            }
            TagEnd::Paragraph => self.flush_paragraph(),
            TagEnd::BlockQuote(_) => {
                self.flush_paragraph();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code_block.take() {
                    self.blocks.push(Block::CodeBlock(code));
                }
            }
            TagEnd::List(_) => {
                self.flush_paragraph();
                self.list_stack.pop();
            }
            TagEnd::Item => {
                self.flush_paragraph();
                self.in_item = false;
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => self.link = self.link.saturating_sub(1),
            TagEnd::TableCell => {
                if let Some(cells) = self.table_cells.as_mut() {
                    cells.push(std::mem::take(&mut self.current));
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                if let Some(cells) = self.table_cells.take() {
                    self.blocks.push(Block::TableRow {
                        header: self.table_header,
                        cells,
                    });
                }
                self.table_header = false;
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        let span = Span {
            text: text.to_string(),
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            code: false,
            strikethrough: self.strikethrough > 0,
            link: self.link > 0,
        };
        // Merge with the previous span when the styling matches
        if let Some(last) = self.current.spans.last_mut() {
            if last.strong == span.strong
                && last.emphasis == span.emphasis
                && last.code == span.code
                && last.strikethrough == span.strikethrough
                && last.link == span.link
            {
                last.text.push_str(&span.text);
                return;
            }
        }
        self.current.spans.push(span);
    }

    fn flush_paragraph(&mut self) {
        let inline = std::mem::take(&mut self.current);
        if inline.is_empty() {
            return;
        }
        if self.in_item {
            let marker = if self.item_marker.is_empty() {
                "•".to_string()
            } else {
                std::mem::take(&mut self.item_marker)
            };
            self.blocks.push(Block::ListItem {
                depth: self.list_stack.len().saturating_sub(1),
                marker,
                content: inline,
            });
        } else if self.quote_depth > 0 {
            self.blocks.push(Block::Quote(inline));
        } else {
            self.blocks.push(Block::Paragraph(inline));
        }
    }

    fn finish(&mut self) {
        self.flush_paragraph();
    }
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(text: &str) -> Vec<Block> {
        PreviewContent::parse(text).blocks
    }

    #[test]
    fn test_heading_levels() {
        let parsed = blocks("# One\n\n## Two\n");
        assert!(matches!(parsed[0], Block::Heading(1, _)));
        assert!(matches!(parsed[1], Block::Heading(2, _)));
    }

    #[test]
    fn test_paragraph_merges_styled_spans() {
        let parsed = blocks("plain **bold** plain");
        let Block::Paragraph(inline) = &parsed[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(inline.spans.len(), 3);
        assert!(inline.spans[1].strong);
        assert_eq!(inline.plain_text(), "plain bold plain");
    }

    #[test]
    fn test_ordered_list_markers() {
        let parsed = blocks("1. first\n2. second\n");
        let markers: Vec<_> = parsed
            .iter()
            .filter_map(|b| match b {
                Block::ListItem { marker, .. } => Some(marker.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec!["1.", "2."]);
    }

    #[test]
    fn test_nested_list_depth() {
        let parsed = blocks("- outer\n  - inner\n");
        let depths: Vec<_> = parsed
            .iter()
            .filter_map(|b| match b {
                Block::ListItem { depth, .. } => Some(*depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, vec![0, 1]);
    }

    #[test]
    fn test_fenced_code_block() {
        let parsed = blocks("```\nlet x = 1;\n```\n");
        assert!(matches!(&parsed[0], Block::CodeBlock(code) if code.contains("let x = 1;")));
    }

    #[test]
    fn test_block_quote() {
        let parsed = blocks("> quoted words\n");
        assert!(matches!(&parsed[0], Block::Quote(_)));
    }

    #[test]
    fn test_quote_close_resets_depth() {
        let parsed = blocks("> quoted\n\nafter the quote\n");
        assert!(matches!(&parsed[0], Block::Quote(_)));
        assert!(matches!(&parsed[1], Block::Paragraph(_)));
    }

    #[test]
    fn test_table_rows() {
        let parsed = blocks("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let rows: Vec<_> = parsed
            .iter()
            .filter_map(|b| match b {
                Block::TableRow { header, cells } => Some((*header, cells.len())),
                _ => None,
            })
            .collect();
        assert_eq!(rows, vec![(true, 2), (false, 2)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(PreviewContent::parse("").is_empty());
    }
}
