use std::sync::Arc;

use crate::config::Config;
use crate::proxy::Forwarder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream sender for the provider proxy. Default: `HttpForwarder`.
    pub forwarder: Arc<dyn Forwarder>,
}
