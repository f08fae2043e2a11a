//! PDF writer for the document model.
//!
//! Uses the base-14 Type1 fonts with WinAnsiEncoding, so nothing is embedded
//! and the output is fully deterministic (no creation date, no IDs).

use encoding_rs::WINDOWS_1252;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::render::document::{
    Alignment, BorderStyle, DocumentModel, Paragraph, Run, PAGE_HEIGHT_TWIPS, PAGE_WIDTH_TWIPS,
};
use crate::render::font_metrics::{get_metrics, greedy_wrap, FontFamily};
use crate::render::RenderError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const LINE_HEIGHT: f32 = 1.3;
/// Size used for the height of empty paragraphs, in points.
const EMPTY_LINE_PT: f32 = 11.0;
/// Gap between the right edge of the first-line text and a trailing run.
const TRAILING_GAP_PT: f32 = 12.0;
/// Gap between the last text line and a bottom rule.
const RULE_PADDING_PT: f32 = 3.0;

/// Resource name and face flags for the four faces of a family.
const FACES: [(&str, bool, bool); 4] = [
    ("F1", false, false),
    ("F2", true, false),
    ("F3", false, true),
    ("F4", true, true),
];

fn twips_to_pt(twips: impl Into<f32>) -> f32 {
    twips.into() / 20.0
}

fn face_resource(run: &Run) -> &'static str {
    FACES
        .iter()
        .find(|(_, bold, italic)| *bold == run.bold && *italic == run.italic)
        .map(|(name, _, _)| *name)
        .unwrap_or("F1")
}

fn real(v: f32) -> Object {
    Object::Real(v.into())
}

/// "2563eb" -> (0.145, 0.388, 0.922). Malformed colors render black.
fn rgb(hex: &str) -> [f32; 3] {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .map(|v| f32::from(v) / 255.0)
            .unwrap_or(0.0)
    };
    [channel(0), channel(2), channel(4)]
}

/// Encodes text for a WinAnsi font. Characters outside Windows-1252 become '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors || bytes.len() != 1 {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

/// One word with the whitespace that preceded it, tagged with its run.
struct Token<'a> {
    run: &'a Run,
    lead: &'a str,
    word: &'a str,
}

fn tokenize(runs: &[Run]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for run in runs {
        let text = run.text.as_str();
        let mut rest = text;
        while !rest.is_empty() {
            let word_start = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            let after_lead = &rest[word_start..];
            let word_len = after_lead
                .find(char::is_whitespace)
                .unwrap_or(after_lead.len());
            if word_len == 0 {
                break;
            }
            tokens.push(Token {
                run,
                lead: &rest[..word_start],
                word: &after_lead[..word_len],
            });
            rest = &after_lead[word_len..];
        }
    }
    tokens
}

struct PdfWriter {
    font: FontFamily,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    cursor_y: f32,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
}

impl PdfWriter {
    fn new(doc: &DocumentModel) -> Self {
        let margin = twips_to_pt(doc.margin);
        let width = twips_to_pt(PAGE_WIDTH_TWIPS as f32);
        let height = twips_to_pt(PAGE_HEIGHT_TWIPS as f32);
        Self {
            font: doc.font,
            left: margin,
            right: width - margin,
            top: height - margin,
            bottom: margin,
            cursor_y: height - margin,
            pages: Vec::new(),
            ops: Vec::new(),
        }
    }

    fn width_pt(&self, run: &Run, text: &str) -> f32 {
        get_metrics(self.font, run.bold).measure_str(text) * size_pt(run)
    }

    fn at_page_top(&self) -> bool {
        (self.cursor_y - self.top).abs() < f32::EPSILON
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.ops);
        self.pages.push(finished);
        self.cursor_y = self.top;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor_y - height < self.bottom && !self.at_page_top() {
            self.new_page();
        }
    }

    fn draw_text(&mut self, run: &Run, text: &str, x: f32, baseline: f32) {
        let [r, g, b] = rgb(run.color);
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![face_resource(run).into(), real(size_pt(run))]),
            Operation::new("rg", vec![real(r), real(g), real(b)]),
            Operation::new("Td", vec![real(x), real(baseline)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn draw_rule(&mut self, y: f32, width: f32, color: &str) {
        let [r, g, b] = rgb(color);
        self.ops.extend([
            Operation::new("RG", vec![real(r), real(g), real(b)]),
            Operation::new("w", vec![real(width)]),
            Operation::new("m", vec![real(self.left), real(y)]),
            Operation::new("l", vec![real(self.right), real(y)]),
            Operation::new("S", vec![]),
        ]);
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        if !self.at_page_top() {
            self.cursor_y -= twips_to_pt(paragraph.spacing_before);
        }

        let text_left = self.left + twips_to_pt(paragraph.indent_left);
        let available = self.right - text_left;
        let trailing_width = paragraph
            .trailing
            .as_ref()
            .map(|run| self.width_pt(run, &run.text) + TRAILING_GAP_PT)
            .unwrap_or(0.0);

        let tokens = tokenize(&paragraph.runs);
        let measured: Vec<(f32, f32)> = tokens
            .iter()
            .map(|t| (self.width_pt(t.run, t.lead), self.width_pt(t.run, t.word)))
            .collect();
        let mut lines = greedy_wrap(&measured, available - trailing_width, available);
        if lines.is_empty() {
            // Keeps empty paragraphs and trailing-only lines one line tall.
            lines.push(0..0);
        }

        for (line_index, range) in lines.into_iter().enumerate() {
            let line_tokens = &tokens[range.clone()];
            let mut size = line_tokens
                .iter()
                .map(|t| size_pt(t.run))
                .fold(0.0_f32, f32::max);
            if line_index == 0 {
                for run in paragraph.trailing.iter().chain(paragraph.bullet.as_ref().map(|b| &b.glyph)) {
                    size = size.max(size_pt(run));
                }
            }
            if size == 0.0 {
                size = EMPTY_LINE_PT;
            }

            let line_height = size * LINE_HEIGHT;
            self.ensure_room(line_height);
            let baseline = self.cursor_y - size;

            let line_width: f32 = measured[range.clone()]
                .iter()
                .enumerate()
                .map(|(i, (lead, word))| if i == 0 { *word } else { lead + word })
                .sum();
            let mut x = match paragraph.alignment {
                Alignment::Center => text_left + (available - line_width).max(0.0) / 2.0,
                Alignment::Left | Alignment::Justified => text_left,
            };

            // Consecutive tokens of the same run are drawn as one string.
            let mut segment_start = 0;
            while segment_start < line_tokens.len() {
                let run = line_tokens[segment_start].run;
                let mut segment_end = segment_start + 1;
                while segment_end < line_tokens.len()
                    && std::ptr::eq(line_tokens[segment_end].run, run)
                {
                    segment_end += 1;
                }
                let mut text = String::new();
                for (i, token) in line_tokens[segment_start..segment_end].iter().enumerate() {
                    if i > 0 || segment_start > 0 {
                        text.push_str(token.lead);
                    }
                    text.push_str(token.word);
                }
                self.draw_text(run, &text, x, baseline);
                x += self.width_pt(run, &text);
                segment_start = segment_end;
            }

            if line_index == 0 {
                if let Some(bullet) = &paragraph.bullet {
                    let glyph_x = text_left - twips_to_pt(bullet.hanging);
                    self.draw_text(&bullet.glyph, &bullet.glyph.text, glyph_x, baseline);
                }
                if let Some(trailing) = &paragraph.trailing {
                    let trailing_x = self.right - self.width_pt(trailing, &trailing.text);
                    self.draw_text(trailing, &trailing.text, trailing_x, baseline);
                }
            }

            self.cursor_y -= line_height;
        }

        if let Some(border) = &paragraph.border_bottom {
            let stroke = f32::from(border.size) / 8.0;
            self.cursor_y -= RULE_PADDING_PT;
            self.draw_rule(self.cursor_y, stroke, border.color);
            if border.style == BorderStyle::Double {
                self.cursor_y -= stroke + 1.5;
                self.draw_rule(self.cursor_y, stroke, border.color);
            }
            self.cursor_y -= RULE_PADDING_PT;
        }

        self.cursor_y -= twips_to_pt(paragraph.spacing_after);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

fn size_pt(run: &Run) -> f32 {
    f32::from(run.size) / 2.0
}

/// Renders the model as a PDF file.
pub fn write_pdf(doc: &DocumentModel) -> Result<Vec<u8>, RenderError> {
    let mut writer = PdfWriter::new(doc);
    for paragraph in &doc.paragraphs {
        writer.paragraph(paragraph);
    }
    let page_ops = writer.finish();

    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for (name, bold, italic) in FACES {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => doc.font.pdf_base_font(bold, italic),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(name, font_id);
    }
    let resources_id = pdf.add_object(dictionary! {
        "Font" => fonts,
    });

    let page_width = twips_to_pt(PAGE_WIDTH_TWIPS as f32);
    let page_height = twips_to_pt(PAGE_HEIGHT_TWIPS as f32);
    let mut kids: Vec<Object> = Vec::with_capacity(page_ops.len());
    for operations in page_ops {
        let content = Content { operations };
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(page_width), real(page_height)],
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&doc.title)),
        "Author" => Object::string_literal(encode_win_ansi(&doc.author)),
        "Producer" => Object::string_literal("resume-api"),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
}
