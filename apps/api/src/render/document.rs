//! Format-neutral document model shared by the DOCX and PDF writers.
//!
//! Units follow word-processing conventions so the DOCX writer can emit them
//! as-is: run sizes are half-points, spacing and indents are twips
//! (1/20 pt), border sizes are eighths of a point. The PDF writer converts.

use crate::render::font_metrics::FontFamily;

/// US letter page width in twips.
pub const PAGE_WIDTH_TWIPS: u32 = 12_240;
/// US letter page height in twips.
pub const PAGE_HEIGHT_TWIPS: u32 = 15_840;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Single,
    Double,
}

/// Paragraph bottom rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub style: BorderStyle,
    /// Line width in eighths of a point.
    pub size: u16,
    /// Hex RGB without the leading `#`.
    pub color: &'static str,
}

/// A span of uniformly formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Half-points.
    pub size: u16,
    /// Hex RGB without the leading `#`.
    pub color: &'static str,
}

impl Run {
    pub fn new(text: impl Into<String>, size: u16, color: &'static str) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            size,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Bullet glyph hung to the left of the paragraph text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bullet {
    pub glyph: Run,
    /// Distance the glyph hangs left of the text start, in twips.
    pub hanging: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    /// Right-aligned run on the first line (dates, graduation year).
    pub trailing: Option<Run>,
    pub bullet: Option<Bullet>,
    pub alignment: Alignment,
    pub spacing_before: u16,
    pub spacing_after: u16,
    /// Left indent of the paragraph text, in twips.
    pub indent_left: u16,
    pub border_bottom: Option<Border>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    pub fn text(run: Run) -> Self {
        Self::new(vec![run])
    }

    /// Empty paragraph used as vertical space or as a carrier for a rule.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn spacing(mut self, before: u16, after: u16) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn indented(mut self, left: u16) -> Self {
        self.indent_left = left;
        self
    }

    pub fn with_border(mut self, border: Option<Border>) -> Self {
        self.border_bottom = border;
        self
    }

    pub fn with_trailing(mut self, run: Run) -> Self {
        self.trailing = Some(run);
        self
    }

    pub fn with_bullet(mut self, glyph: Run, hanging: u16) -> Self {
        self.bullet = Some(Bullet { glyph, hanging });
        self
    }

    /// Concatenated text of all runs, without bullet or trailing run.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A complete laid-out document: one section, uniform page margins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    pub paragraphs: Vec<Paragraph>,
    /// Page margin on all four sides, in twips.
    pub margin: u16,
    pub font: FontFamily,
    pub title: String,
    pub author: String,
}

impl DocumentModel {
    /// Text width between the margins, in twips.
    pub fn content_width(&self) -> u32 {
        PAGE_WIDTH_TWIPS.saturating_sub(2 * u32::from(self.margin))
    }
}
