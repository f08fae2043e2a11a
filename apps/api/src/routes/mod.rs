pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::proxy::handlers as proxy;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::upload;

/// Headroom on top of the file limit for multipart boundaries and part headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume parsing and rendering
        .route("/api/v1/resumes/parse", post(resume::handle_parse))
        .route("/api/v1/resumes/render", post(resume::handle_render))
        .route(
            "/api/v1/resumes/render-markdown",
            post(resume::handle_render_markdown),
        )
        .route(
            "/api/v1/resumes/extract",
            post(upload::handle_extract).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/cover-letters/render",
            post(resume::handle_render_cover_letter),
        )
        // Provider proxy
        .route("/api/anthropic", post(proxy::handle_anthropic))
        .route("/api/openai", post(proxy::handle_openai))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::proxy::{Forwarder, HttpForwarder, ProxyError, ProxyRequest, UpstreamResponse};

    const JANE_DOE: &str = "Jane Doe\n\
        jane@x.com | 555-000-1111 | Austin, TX\n\
        \n\
        EXPERIENCE\n\
        Senior Engineer | Acme Corp\n\
        Jan 2020 - Present\n\
        - Shipped X\n\
        - Shipped Y\n\
        \n\
        SKILLS\n\
        Python, Go, SQL";

    struct RecordingForwarder {
        status: u16,
        seen: Mutex<Vec<ProxyRequest>>,
    }

    impl RecordingForwarder {
        fn new(status: u16) -> Arc<Self> {
            Arc::new(Self {
                status,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Forwarder for RecordingForwarder {
        async fn forward(&self, request: ProxyRequest) -> Result<UpstreamResponse, ProxyError> {
            self.seen.lock().unwrap().push(request);
            Ok(UpstreamResponse {
                status: self.status,
                body: Bytes::from_static(br#"{"id":"msg_1"}"#),
            })
        }
    }

    fn app_with(forwarder: Arc<dyn Forwarder>) -> Router {
        build_router(AppState {
            config: Config::default(),
            forwarder,
        })
    }

    fn app() -> Router {
        app_with(RecordingForwarder::new(200))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn header_str<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
        response.headers().get(name).unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_parse_returns_resume_data() {
        let response = app()
            .oneshot(post_json("/api/v1/resumes/parse", json!({ "text": JANE_DOE })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Jane Doe");
        assert_eq!(body["contact"]["location"], "Austin, TX");
        assert_eq!(body["experience"][0]["bullets"].as_array().unwrap().len(), 2);
        assert_eq!(body["skills"], json!(["Python", "Go", "SQL"]));
        assert!(body.get("certifications").is_none());
    }

    #[tokio::test]
    async fn test_parse_rejects_empty_text() {
        let response = app()
            .oneshot(post_json("/api/v1/resumes/parse", json!({ "text": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_render_pdf_attachment() {
        let request = post_json(
            "/api/v1/resumes/render",
            json!({
                "text": JANE_DOE,
                "template": "classic",
                "format": "pdf",
                "company": "Acme Corp",
                "job_title": "Staff Engineer"
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CONTENT_TYPE), "application/pdf");
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"Resume_Acme_Corp_Staff_Engineer.pdf\""
        );
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_render_defaults_to_docx_named_after_candidate() {
        let response = app()
            .oneshot(post_json("/api/v1/resumes/render", json!({ "text": JANE_DOE })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"Resume_Jane_Doe.docx\""
        );
        assert!(body_bytes(response).await.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_render_rejects_unknown_format() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/resumes/render",
                json!({ "text": JANE_DOE, "format": "odt" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_render_markdown_docx() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/resumes/render-markdown",
                json!({ "markdown": "# Jane Doe\n\njane@x.com\n\n## Skills\n\n- Go", "template": "minimalist" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"Resume_Jane_Doe.docx\""
        );
    }

    #[tokio::test]
    async fn test_cover_letter_docx() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/cover-letters/render",
                json!({
                    "content": "Dear team,\n\nI would love to join.",
                    "candidate_name": "Jane Doe",
                    "company": "Initech",
                    "job_title": "Engineer"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"CoverLetter_Initech_Engineer.docx\""
        );
    }

    #[tokio::test]
    async fn test_extract_rejects_unreadable_pdf() {
        let body = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"resume.pdf\"\r\n\
            Content-Type: application/pdf\r\n\
            \r\n\
            not a pdf at all\r\n\
            --XBOUNDARY--\r\n";
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/extract")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_anthropic_requires_api_key() {
        let response = app()
            .oneshot(post_json("/api/anthropic", json!({ "model": "m" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "API key required" }));
    }

    #[tokio::test]
    async fn test_anthropic_forwards_key_version_and_status() {
        let forwarder = RecordingForwarder::new(429);
        let mut request = post_json("/api/anthropic", json!({ "model": "m" }));
        request
            .headers_mut()
            .insert("x-api-key", "sk-test".parse().unwrap());

        let response = app_with(forwarder.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_bytes(response).await, Bytes::from_static(br#"{"id":"msg_1"}"#));

        let seen = forwarder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://api.anthropic.com/v1/messages");
        assert!(seen[0]
            .headers
            .contains(&("x-api-key", "sk-test".to_string())));
        assert!(seen[0]
            .headers
            .contains(&("anthropic-version", "2023-06-01".to_string())));
        assert_eq!(seen[0].body, Bytes::from(json!({ "model": "m" }).to_string()));
    }

    #[tokio::test]
    async fn test_openai_requires_and_forwards_authorization() {
        let response = app()
            .oneshot(post_json("/api/openai", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let forwarder = RecordingForwarder::new(200);
        let mut request = post_json("/api/openai", json!({}));
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer sk-test".parse().unwrap());
        let response = app_with(forwarder.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen = forwarder.seen.lock().unwrap();
        assert_eq!(
            seen[0].headers,
            vec![("authorization", "Bearer sk-test".to_string())]
        );
    }

    #[tokio::test]
    async fn test_proxy_transport_failure_is_500() {
        let forwarder = HttpForwarder::new(Duration::from_secs(5)).unwrap();
        let app = build_router(AppState {
            config: Config {
                anthropic_api_url: "http://127.0.0.1:1/v1/messages".to_string(),
                ..Config::default()
            },
            forwarder: Arc::new(forwarder),
        });
        let mut request = post_json("/api/anthropic", json!({}));
        request
            .headers_mut()
            .insert("x-api-key", "sk-test".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Proxy error");
        assert!(body["details"].is_string());
    }
}
