use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::proxy::{Provider, ProxyRequest, DEFAULT_ANTHROPIC_VERSION};
use crate::state::AppState;

/// POST /api/anthropic
pub async fn handle_anthropic(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(api_key) = header_value(&headers, Provider::Anthropic.credential_header()) else {
        return missing_credential(Provider::Anthropic);
    };
    let version = header_value(&headers, "anthropic-version")
        .unwrap_or_else(|| DEFAULT_ANTHROPIC_VERSION.to_string());

    let request = ProxyRequest {
        url: state.config.anthropic_api_url.clone(),
        headers: vec![("x-api-key", api_key), ("anthropic-version", version)],
        body,
    };
    forward(&state, Provider::Anthropic, request).await
}

/// POST /api/openai
pub async fn handle_openai(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(authorization) = header_value(&headers, Provider::Openai.credential_header()) else {
        return missing_credential(Provider::Openai);
    };

    let request = ProxyRequest {
        url: state.config.openai_api_url.clone(),
        headers: vec![("authorization", authorization)],
        body,
    };
    forward(&state, Provider::Openai, request).await
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn missing_credential(provider: Provider) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": provider.missing_credential_message() })),
    )
        .into_response()
}

async fn forward(state: &AppState, provider: Provider, request: ProxyRequest) -> Response {
    match state.forwarder.forward(request).await {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            if !status.is_success() {
                tracing::warn!(provider = provider.name(), %status, "upstream returned an error");
            }
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                upstream.body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(provider = provider.name(), "Proxy error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Proxy error", "details": e.to_string() })),
            )
                .into_response()
        }
    }
}
