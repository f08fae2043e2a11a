use chrono::NaiveDate;

use crate::render::document::{DocumentModel, Paragraph, Run};
use crate::render::docx::write_docx;
use crate::render::font_metrics::FontFamily;
use crate::render::RenderError;
use crate::resume::markdown::strip_markdown;

const BODY_SIZE: u16 = 22;
const TEXT_COLOR: &str = "000000";

/// Lays out a cover letter: date line, body paragraphs, sign-off, name.
/// The date is passed in so output depends on arguments alone.
pub fn layout_cover_letter(content: &str, candidate_name: &str, date: NaiveDate) -> DocumentModel {
    let body = strip_markdown(content);

    let mut paragraphs = vec![Paragraph::text(Run::new(
        date.format("%B %-d, %Y").to_string(),
        BODY_SIZE,
        TEXT_COLOR,
    ))
    .spacing(0, 400)];

    paragraphs.extend(
        body.split("\n\n")
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(|block| Paragraph::text(Run::new(block, BODY_SIZE, TEXT_COLOR)).spacing(0, 240)),
    );

    paragraphs.push(Paragraph::text(Run::new("Sincerely,", BODY_SIZE, TEXT_COLOR)).spacing(240, 480));
    paragraphs.push(Paragraph::text(Run::new(candidate_name, BODY_SIZE, TEXT_COLOR)));

    DocumentModel {
        paragraphs,
        margin: 1440,
        font: FontFamily::Helvetica,
        title: format!("{candidate_name} - Cover Letter"),
        author: candidate_name.to_string(),
    }
}

pub fn render_cover_letter_docx(
    content: &str,
    candidate_name: &str,
    date: NaiveDate,
) -> Result<Vec<u8>, RenderError> {
    write_docx(&layout_cover_letter(content, candidate_name, date))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = "Dear Hiring Manager,\n\n\
        I am **excited** to apply.\n\n\n\
        My background fits the role.";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 9).unwrap()
    }

    #[test]
    fn test_cover_letter_structure() {
        let doc = layout_cover_letter(LETTER, "Jane Doe", date());
        let texts: Vec<String> = doc.paragraphs.iter().map(Paragraph::plain_text).collect();
        assert_eq!(
            texts,
            vec![
                "October 9, 2026",
                "Dear Hiring Manager,",
                "I am excited to apply.",
                "My background fits the role.",
                "Sincerely,",
                "Jane Doe",
            ]
        );
        assert_eq!(doc.margin, 1440);
        assert_eq!(doc.paragraphs[0].spacing_after, 400);
    }

    #[test]
    fn test_cover_letter_docx_is_deterministic() {
        let first = render_cover_letter_docx(LETTER, "Jane Doe", date()).unwrap();
        let second = render_cover_letter_docx(LETTER, "Jane Doe", date()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(b"PK"));
    }
}
