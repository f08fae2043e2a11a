//! DOCX generation straight from markdown, for documents the user edited as
//! markdown. Mirrors what the markdown preview shows instead of re-parsing the
//! text into a `ResumeData` record. Only the palette and font are shared with
//! the template styles.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

use crate::render::document::{Alignment, Border, BorderStyle, DocumentModel, Paragraph, Run};
use crate::render::docx::write_docx;
use crate::render::style::Palette;
use crate::render::{RenderError, Template};

const BODY_SIZE: u16 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Heading(HeadingLevel),
    Paragraph,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    text: String,
    bold: bool,
    italic: bool,
}

struct MarkdownLayout {
    template: Template,
    palette: Palette,
    paragraphs: Vec<Paragraph>,
    /// True right after the name heading: the next paragraph may be the contact line.
    after_name: bool,
    name: Option<String>,
    block: Option<Block>,
    spans: Vec<Span>,
    strong: usize,
    emphasis: usize,
    /// Nesting depth inside blocks that are dropped from the output.
    skipped: usize,
}

/// Headings below level 3, code blocks and blockquotes have no place in the
/// resume layout.
fn is_dropped(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Heading(HeadingLevel::H4 | HeadingLevel::H5 | HeadingLevel::H6, _, _)
            | Tag::CodeBlock(_)
            | Tag::BlockQuote
    )
}

impl MarkdownLayout {
    fn new(template: Template) -> Self {
        Self {
            template,
            palette: template.style().palette,
            paragraphs: Vec::new(),
            after_name: true,
            name: None,
            block: None,
            spans: Vec::new(),
            strong: 0,
            emphasis: 0,
            skipped: 0,
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.skipped > 0 {
            return;
        }
        if self.block.is_none() {
            // Bare inline content (e.g. inside a tight list item) still needs a home.
            self.block = Some(Block::Paragraph);
        }
        let bold = self.strong > 0;
        let italic = self.emphasis > 0;
        match self.spans.last_mut() {
            Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                bold,
                italic,
            }),
        }
    }

    fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn inline_runs(&self, color: &'static str) -> Vec<Run> {
        self.spans
            .iter()
            .map(|span| Run {
                text: span.text.clone(),
                bold: span.bold,
                italic: span.italic,
                size: BODY_SIZE,
                color,
            })
            .collect()
    }

    fn centered_if_classic(&self) -> Alignment {
        if self.template == Template::Classic {
            Alignment::Center
        } else {
            Alignment::Left
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        if is_dropped(&tag) {
            self.skipped += 1;
            return;
        }
        if self.skipped > 0 {
            return;
        }
        match tag {
            Tag::Heading(level, _, _) => self.open(Block::Heading(level)),
            // Paragraphs inside list items belong to the item.
            Tag::Paragraph if self.block == Some(Block::Item) => {}
            Tag::Paragraph => self.open(Block::Paragraph),
            Tag::Item => self.open(Block::Item),
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        if is_dropped(&tag) {
            self.skipped = self.skipped.saturating_sub(1);
            return;
        }
        if self.skipped > 0 {
            return;
        }
        match tag {
            Tag::Heading(..) | Tag::Item => self.flush(),
            Tag::Paragraph if self.block == Some(Block::Item) => self.push_text(" "),
            Tag::Paragraph => self.flush(),
            Tag::Strong => self.strong = self.strong.saturating_sub(1),
            Tag::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            _ => {}
        }
    }

    /// Starts a block, flushing whatever was still open (nested list items).
    fn open(&mut self, block: Block) {
        self.flush();
        self.block = Some(block);
    }

    fn flush(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };
        let text = self.plain_text();
        let text = text.trim();
        if text.is_empty() {
            self.spans.clear();
            return;
        }

        let palette = self.palette;
        let paragraph = match block {
            Block::Heading(HeadingLevel::H1) => {
                self.after_name = true;
                self.name.get_or_insert_with(|| text.to_string());
                let border = (self.template == Template::Modern).then_some(Border {
                    style: BorderStyle::Single,
                    size: 12,
                    color: palette.primary,
                });
                Paragraph::text(Run::new(text, 48, palette.primary).bold())
                    .aligned(self.centered_if_classic())
                    .spacing(0, 100)
                    .with_border(border)
            }
            Block::Heading(HeadingLevel::H2) => {
                self.after_name = false;
                Paragraph::text(Run::new(text.to_uppercase(), 24, palette.primary).bold())
                    .aligned(self.centered_if_classic())
                    .spacing(240, 120)
                    .with_border(Some(Border {
                        style: BorderStyle::Single,
                        size: 4,
                        color: palette.muted,
                    }))
            }
            // H3; deeper headings never open a block.
            Block::Heading(_) => {
                Paragraph::text(Run::new(text, BODY_SIZE, palette.text).bold()).spacing(160, 60)
            }
            Block::Paragraph => {
                let is_contact = self.after_name && (text.contains('|') || text.contains('@'));
                self.after_name = false;
                if is_contact {
                    let border = (self.template == Template::Modern).then_some(Border {
                        style: BorderStyle::Single,
                        size: 12,
                        color: palette.primary,
                    });
                    Paragraph::new(self.inline_runs(palette.muted))
                        .aligned(self.centered_if_classic())
                        .spacing(0, 200)
                        .with_border(border)
                } else {
                    Paragraph::new(self.inline_runs(palette.text)).spacing(0, 120)
                }
            }
            Block::Item => {
                let glyph = if self.template == Template::Minimalist {
                    "— "
                } else {
                    "- "
                };
                let mut runs = vec![Run::new(glyph, BODY_SIZE, palette.muted)];
                runs.extend(self.inline_runs(palette.text));
                if let Some(last) = runs.last_mut() {
                    let trimmed = last.text.trim_end().len();
                    last.text.truncate(trimmed);
                }
                Paragraph::new(runs).indented(360).spacing(0, 60)
            }
        };

        self.spans.clear();
        self.paragraphs.push(paragraph);
    }

    fn rule(&mut self) {
        if self.skipped > 0 {
            return;
        }
        self.flush();
        self.paragraphs.push(
            Paragraph::empty().spacing(120, 120).with_border(Some(Border {
                style: BorderStyle::Single,
                size: 4,
                color: self.palette.muted,
            })),
        );
    }

    fn finish(mut self) -> DocumentModel {
        self.flush();
        let name = self.name.unwrap_or_else(|| "Resume".to_string());
        let margin = if self.template == Template::Minimalist {
            1080
        } else {
            720
        };
        DocumentModel {
            paragraphs: self.paragraphs,
            margin,
            font: self.template.style().font,
            title: format!("{name} - Resume"),
            author: name,
        }
    }
}

/// Lays out markdown into a document model without writing it.
pub fn layout_markdown(markdown: &str, template: Template) -> DocumentModel {
    let mut layout = MarkdownLayout::new(template);
    for event in Parser::new(markdown) {
        match event {
            Event::Start(tag) => layout.start(tag),
            Event::End(tag) => layout.end(tag),
            Event::Text(text) | Event::Code(text) => layout.push_text(&text),
            Event::SoftBreak => layout.push_text(" "),
            Event::HardBreak => layout.push_text("\n"),
            Event::Rule => layout.rule(),
            _ => {}
        }
    }
    layout.finish()
}

pub fn render_markdown_docx(markdown: &str, template: Template) -> Result<Vec<u8>, RenderError> {
    write_docx(&layout_markdown(markdown, template))
}
