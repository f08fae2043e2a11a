use anyhow::{Context, Result};

use crate::render::Template;

const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_url: String,
    pub openai_api_url: String,
    pub proxy_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub default_template: Template,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            anthropic_api_url: env_or("ANTHROPIC_API_URL", DEFAULT_ANTHROPIC_API_URL),
            openai_api_url: env_or("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            proxy_timeout_secs: parse_env("PROXY_TIMEOUT_SECS", 120)
                .context("PROXY_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            default_template: Template::from_name(&env_or("DEFAULT_TEMPLATE", "modern")),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_url: DEFAULT_ANTHROPIC_API_URL.to_string(),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            proxy_timeout_secs: 120,
            max_upload_bytes: 10 * 1024 * 1024,
            default_template: Template::Modern,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
