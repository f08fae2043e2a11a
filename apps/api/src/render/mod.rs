//! Document rendering: template styles, the layout engine, and the DOCX/PDF
//! writers.
//!
//! Pipeline: raw text -> `strip_markdown` -> `parse_resume` -> `layout_resume`
//! -> `write_docx` / `write_pdf`. Every step is pure; the same input always
//! yields the same bytes.

pub mod cover_letter;
pub mod document;
pub mod docx;
pub mod font_metrics;
pub mod layout;
pub mod markdown_docx;
pub mod pdf;
pub mod style;

use thiserror::Error;

use crate::render::docx::{write_docx, DOCX_CONTENT_TYPE};
use crate::render::layout::layout_resume;
use crate::render::pdf::{write_pdf, PDF_CONTENT_TYPE};
use crate::render::style::{Style, CLASSIC, MINIMALIST, MODERN};
use crate::resume::assembler::parse_resume;
use crate::resume::markdown::strip_markdown;

/// Any failure inside a document writer. Callers only ever see
/// "document generation failed"; the source is logged.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("zip packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("pdf serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("document write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    #[default]
    Modern,
    Classic,
    Minimalist,
}

impl Template {
    /// Case-insensitive lookup; anything unrecognized renders as modern.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Template::Classic,
            "minimalist" => Template::Minimalist,
            _ => Template::Modern,
        }
    }

    pub fn style(self) -> &'static Style {
        match self {
            Template::Modern => &MODERN,
            Template::Classic => &CLASSIC,
            Template::Minimalist => &MINIMALIST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "docx" => Some(OutputFormat::Docx),
            "pdf" => Some(OutputFormat::Pdf),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Docx => DOCX_CONTENT_TYPE,
            OutputFormat::Pdf => PDF_CONTENT_TYPE,
        }
    }
}

/// Which kind of file a download name is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Resume => "Resume",
            DocumentKind::CoverLetter => "CoverLetter",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Target job the document is tailored for; only feeds the filename.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobTarget<'a> {
    pub company: Option<&'a str>,
    pub job_title: Option<&'a str>,
}

/// Renders plain or markdown resume text into a finished file.
pub fn render_resume(
    text: &str,
    template: Template,
    format: OutputFormat,
    target: JobTarget<'_>,
) -> Result<RenderedDocument, RenderError> {
    let data = parse_resume(&strip_markdown(text));
    let model = layout_resume(&data, template.style());

    let bytes = match format {
        OutputFormat::Docx => write_docx(&model)?,
        OutputFormat::Pdf => write_pdf(&model)?,
    };

    tracing::debug!(
        template = ?template,
        format = format.extension(),
        paragraphs = model.paragraphs.len(),
        size = bytes.len(),
        "resume rendered"
    );

    Ok(RenderedDocument {
        bytes,
        filename: suggested_filename(
            DocumentKind::Resume,
            target,
            Some(data.name.as_str()),
            format.extension(),
        ),
        content_type: format.content_type(),
    })
}

/// `Resume_<Company>_<Title>.<ext>`, falling back to the candidate name and
/// then to the bare prefix. Whitespace runs become `_`; characters that would
/// break a `Content-Disposition` header are dropped.
pub fn suggested_filename(
    kind: DocumentKind,
    target: JobTarget<'_>,
    name: Option<&str>,
    extension: &str,
) -> String {
    let job_parts: Vec<String> = [target.company, target.job_title]
        .into_iter()
        .flatten()
        .map(filename_part)
        .filter(|part| !part.is_empty())
        .collect();

    let parts = if job_parts.is_empty() {
        // The parser's placeholder name says nothing about the candidate.
        name.filter(|n| *n != "Resume")
            .map(filename_part)
            .filter(|part| !part.is_empty())
            .into_iter()
            .collect()
    } else {
        job_parts
    };

    let mut filename = kind.prefix().to_string();
    for part in parts {
        filename.push('_');
        filename.push_str(&part);
    }
    format!("{filename}.{extension}")
}

fn filename_part(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !matches!(c, '"' | '\\' | '/' | ';') && !c.is_control())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Jane Doe\n\
        jane@x.com | 555-000-1111 | Austin, TX\n\
        \n\
        SUMMARY\n\
        Backend engineer.\n\
        \n\
        EXPERIENCE\n\
        Senior Engineer | Acme Corp | Jan 2020 - Present\n\
        - Built the billing pipeline\n\
        \n\
        SKILLS\n\
        Python, Go, SQL";

    #[test]
    fn test_template_from_name_falls_back_to_modern() {
        assert_eq!(Template::from_name("Classic"), Template::Classic);
        assert_eq!(Template::from_name("minimalist"), Template::Minimalist);
        assert_eq!(Template::from_name("baroque"), Template::Modern);
        assert_eq!(Template::from_name(""), Template::Modern);
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("PDF"), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::from_name("docx"), Some(OutputFormat::Docx));
        assert_eq!(OutputFormat::from_name("odt"), None);
    }

    #[test]
    fn test_rendering_is_byte_identical() {
        for template in [Template::Modern, Template::Classic, Template::Minimalist] {
            for format in [OutputFormat::Docx, OutputFormat::Pdf] {
                let first = render_resume(SAMPLE, template, format, JobTarget::default()).unwrap();
                let second = render_resume(SAMPLE, template, format, JobTarget::default()).unwrap();
                assert_eq!(first.bytes, second.bytes, "{template:?} {format:?}");
            }
        }
    }

    #[test]
    fn test_unknown_template_renders_as_modern() {
        let unknown = render_resume(
            SAMPLE,
            Template::from_name("unknown"),
            OutputFormat::Docx,
            JobTarget::default(),
        )
        .unwrap();
        let modern =
            render_resume(SAMPLE, Template::Modern, OutputFormat::Docx, JobTarget::default()).unwrap();
        assert_eq!(unknown.bytes, modern.bytes);
    }

    #[test]
    fn test_rendered_document_metadata() {
        let target = JobTarget {
            company: Some("Acme Corp"),
            job_title: Some("Staff  Engineer"),
        };
        let pdf = render_resume(SAMPLE, Template::Classic, OutputFormat::Pdf, target).unwrap();
        assert_eq!(pdf.filename, "Resume_Acme_Corp_Staff_Engineer.pdf");
        assert_eq!(pdf.content_type, "application/pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_suggested_filename_fallbacks() {
        let none = JobTarget::default();
        assert_eq!(
            suggested_filename(DocumentKind::Resume, none, Some("Jane Doe"), "docx"),
            "Resume_Jane_Doe.docx"
        );
        assert_eq!(
            suggested_filename(DocumentKind::Resume, none, Some("Resume"), "pdf"),
            "Resume.pdf"
        );
        assert_eq!(
            suggested_filename(DocumentKind::CoverLetter, none, None, "docx"),
            "CoverLetter.docx"
        );
        let company_only = JobTarget {
            company: Some("Initech \"LLC\""),
            job_title: Some("   "),
        };
        assert_eq!(
            suggested_filename(DocumentKind::CoverLetter, company_only, Some("Jane"), "docx"),
            "CoverLetter_Initech_LLC.docx"
        );
    }
}
