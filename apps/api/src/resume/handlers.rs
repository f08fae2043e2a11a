use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::render::cover_letter::render_cover_letter_docx;
use crate::render::docx::DOCX_CONTENT_TYPE;
use crate::render::markdown_docx::render_markdown_docx;
use crate::render::{
    render_resume, suggested_filename, DocumentKind, JobTarget, OutputFormat, RenderError,
    RenderedDocument, Template,
};
use crate::resume::assembler::parse_resume;
use crate::resume::markdown::strip_markdown;
use crate::resume::model::ResumeData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    pub template: Option<String>,
    pub format: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderMarkdownRequest {
    pub markdown: String,
    pub template: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub content: String,
    pub candidate_name: String,
    pub company: Option<String>,
    pub job_title: Option<String>,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse(Json(req): Json<ParseRequest>) -> Result<Json<ResumeData>, AppError> {
    require_text("text", &req.text)?;
    Ok(Json(parse_resume(&strip_markdown(&req.text))))
}

/// POST /api/v1/resumes/render
pub async fn handle_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Response, AppError> {
    require_text("text", &req.text)?;
    let template = resolve_template(&state, req.template.as_deref());
    let format = match req.format.as_deref() {
        None => OutputFormat::Docx,
        Some(name) => OutputFormat::from_name(name).ok_or_else(|| {
            AppError::Validation(format!("Unsupported format '{name}', expected docx or pdf"))
        })?,
    };

    tracing::info!(?template, format = format.extension(), "rendering resume");

    let document = run_blocking(move || {
        let target = JobTarget {
            company: req.company.as_deref(),
            job_title: req.job_title.as_deref(),
        };
        render_resume(&req.text, template, format, target)
    })
    .await?;

    Ok(attachment(document))
}

/// POST /api/v1/resumes/render-markdown
pub async fn handle_render_markdown(
    State(state): State<AppState>,
    Json(req): Json<RenderMarkdownRequest>,
) -> Result<Response, AppError> {
    require_text("markdown", &req.markdown)?;
    let template = resolve_template(&state, req.template.as_deref());

    tracing::info!(?template, "rendering markdown resume");

    let document = run_blocking(move || {
        let bytes = render_markdown_docx(&req.markdown, template)?;
        let name = markdown_name(&req.markdown);
        let target = JobTarget {
            company: req.company.as_deref(),
            job_title: req.job_title.as_deref(),
        };
        Ok(RenderedDocument {
            bytes,
            filename: suggested_filename(DocumentKind::Resume, target, name, "docx"),
            content_type: DOCX_CONTENT_TYPE,
        })
    })
    .await?;

    Ok(attachment(document))
}

/// POST /api/v1/cover-letters/render
pub async fn handle_render_cover_letter(
    Json(req): Json<CoverLetterRequest>,
) -> Result<Response, AppError> {
    require_text("content", &req.content)?;
    let today = chrono::Local::now().date_naive();

    let document = run_blocking(move || {
        let bytes = render_cover_letter_docx(&req.content, req.candidate_name.trim(), today)?;
        let target = JobTarget {
            company: req.company.as_deref(),
            job_title: req.job_title.as_deref(),
        };
        Ok(RenderedDocument {
            bytes,
            filename: suggested_filename(
                DocumentKind::CoverLetter,
                target,
                Some(req.candidate_name.as_str()),
                "docx",
            ),
            content_type: DOCX_CONTENT_TYPE,
        })
    })
    .await?;

    Ok(attachment(document))
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("'{field}' must not be empty")));
    }
    Ok(())
}

fn resolve_template(state: &AppState, requested: Option<&str>) -> Template {
    requested
        .map(Template::from_name)
        .unwrap_or(state.config.default_template)
}

/// First `# ` heading of a markdown document, used for the download name.
fn markdown_name(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .find_map(|line| line.trim().strip_prefix("# "))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Document writers are CPU-bound; keep them off the async executor.
async fn run_blocking<F>(render: F) -> Result<RenderedDocument, AppError>
where
    F: FnOnce() -> Result<RenderedDocument, RenderError> + Send + 'static,
{
    let document = tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;
    Ok(document)
}

fn attachment(document: RenderedDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    (
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_name_reads_first_h1() {
        assert_eq!(markdown_name("\n# Jane Doe\n## Skills"), Some("Jane Doe"));
        assert_eq!(markdown_name("## Skills\nPython"), None);
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(matches!(
            require_text("text", "  \n"),
            Err(AppError::Validation(_))
        ));
        assert!(require_text("text", "Jane").is_ok());
    }
}
