//! Configuration types.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Read an env var and parse it, falling back to `default` when it is
/// unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparseable configuration value");
                default
            }
        },
        Err(_) => default,
    }
}

/// Presentation pacing for the coach conversation.
///
/// None of these delays gate correctness; the engine commits every state
/// change before pausing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachConfig {
    /// Pause between the user submitting text and the bot reacting.
    pub input_delay: Duration,
    /// Pause between a follow-up message and the next question.
    pub follow_up_delay: Duration,
    /// Pause between the summary report and the readiness message.
    pub summary_delay: Duration,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            input_delay: Duration::from_millis(500),
            follow_up_delay: Duration::from_millis(1500),
            summary_delay: Duration::from_millis(1000),
        }
    }
}

impl CoachConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input_delay: Duration::from_millis(env_or(
                "JIC_INPUT_DELAY_MS",
                defaults.input_delay.as_millis() as u64,
            )),
            follow_up_delay: Duration::from_millis(env_or(
                "JIC_FOLLOW_UP_DELAY_MS",
                defaults.follow_up_delay.as_millis() as u64,
            )),
            summary_delay: Duration::from_millis(env_or(
                "JIC_SUMMARY_DELAY_MS",
                defaults.summary_delay.as_millis() as u64,
            )),
        }
    }

    /// No pacing at all. Used by the HTTP API, where the browser paces.
    pub fn immediate() -> Self {
        Self {
            input_delay: Duration::ZERO,
            follow_up_delay: Duration::ZERO,
            summary_delay: Duration::ZERO,
        }
    }
}

/// Where the assistant backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    /// Path prefix under which source documents are served (`/pdfs/` or `/sources/`).
    pub source_prefix: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout: Duration::from_secs(30),
            source_prefix: "/pdfs/".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_url = std::env::var("JIC_BACKEND_URL").unwrap_or(defaults.base_url);
        let source_prefix = std::env::var("JIC_SOURCE_PREFIX").unwrap_or(defaults.source_prefix);
        Ok(Self {
            base_url: validate_base_url(&base_url)?,
            timeout: Duration::from_secs(env_or(
                "JIC_BACKEND_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            source_prefix: normalize_prefix(&source_prefix),
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            key: "JIC_BACKEND_URL".to_string(),
            message: format!("expected an http(s) URL, got {raw:?}"),
        });
    }
    Ok(url.to_string())
}

/// Ensure a path prefix starts and ends with `/`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// HTTP server configuration for the coach API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Sessions untouched for this long are dropped.
    pub session_idle_timeout: Duration,
    /// How often idle sessions are swept.
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8090,
            session_idle_timeout: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_or("JIC_HTTP_PORT", defaults.port),
            session_idle_timeout: Duration::from_secs(
                60 * env_or(
                    "JIC_SESSION_IDLE_MINS",
                    defaults.session_idle_timeout.as_secs() / 60,
                ),
            ),
            sweep_interval: defaults.sweep_interval,
        }
    }
}
