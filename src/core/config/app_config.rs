// Runtime configuration for the relay. Everything comes from environment
// variables (with `.env` support handled in main), validated up front so a
// misconfigured process dies at startup instead of mid-relay.

use std::time::Duration;

use thiserror::Error;

use crate::core::relay::DEFAULT_CHUNK_LIMIT;

pub const DEFAULT_TRANSLATION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TARGET_LANGUAGE: &str = "English";
pub const DEFAULT_DISCORD_TIMEOUT_SECONDS: f64 = 12.0;

/// Errors raised when required runtime configuration is missing or invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("{name} must be {expected}, got `{value}`")]
    InvalidValue {
        name: String,
        expected: &'static str,
        value: String,
    },

    #[error("TELEGRAM_SOURCE_CHATS cannot be empty")]
    NoSourceChats,
}

/// One monitored chat: a numeric Telegram chat ID (channels and supergroups
/// are negative, e.g. -1001234567890) or a public username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceChat {
    Id(i64),
    Username(String),
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_source_chats: Vec<SourceChat>,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub target_language: String,
    pub discord_webhook_url: String,
    pub discord_timeout: Duration,
    pub discord_message_limit: usize,
}

impl AppConfig {
    /// Build application config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source_chats = parse_source_chats(&require_env("TELEGRAM_SOURCE_CHATS")?);
        if source_chats.is_empty() {
            return Err(ConfigError::NoSourceChats);
        }

        let timeout_raw = env_or_default(
            "DISCORD_TIMEOUT_SECONDS",
            &DEFAULT_DISCORD_TIMEOUT_SECONDS.to_string(),
        );
        // try_from_secs_f64 also rejects NaN, negatives, and values too large
        // for a Duration, so a bad value cannot panic later at send time.
        let discord_timeout = match timeout_raw.parse::<f64>().ok().and_then(|seconds| {
            if seconds > 0.0 {
                Duration::try_from_secs_f64(seconds).ok()
            } else {
                None
            }
        }) {
            Some(timeout) => timeout,
            None => {
                return Err(ConfigError::InvalidValue {
                    name: "DISCORD_TIMEOUT_SECONDS".to_string(),
                    expected: "a positive number of seconds",
                    value: timeout_raw,
                })
            }
        };

        let limit_raw = env_or_default("DISCORD_MESSAGE_LIMIT", &DEFAULT_CHUNK_LIMIT.to_string());
        let message_limit: usize = match limit_raw.parse() {
            Ok(limit) if limit >= 1 => limit,
            _ => {
                return Err(ConfigError::InvalidValue {
                    name: "DISCORD_MESSAGE_LIMIT".to_string(),
                    expected: "a positive integer",
                    value: limit_raw,
                })
            }
        };

        Ok(Self {
            telegram_bot_token: require_env("TELEGRAM_BOT_TOKEN")?,
            telegram_source_chats: source_chats,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: env_or_default("GEMINI_MODEL", DEFAULT_TRANSLATION_MODEL),
            target_language: env_or_default("TARGET_LANGUAGE", DEFAULT_TARGET_LANGUAGE),
            discord_webhook_url: require_env("DISCORD_WEBHOOK_URL")?,
            discord_timeout,
            discord_message_limit: message_limit,
        })
    }
}

/// Read an environment variable and fail with a clear message when missing
/// or blank.
fn require_env(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name.to_string())),
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Parse chat IDs/usernames from comma-separated env text.
///
/// Numeric tokens (including negative channel IDs) become `SourceChat::Id`;
/// anything else is kept as a username. Blank tokens are skipped.
pub fn parse_source_chats(raw_value: &str) -> Vec<SourceChat> {
    raw_value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<i64>() {
            Ok(id) => SourceChat::Id(id),
            Err(_) => SourceChat::Username(token.to_string()),
        })
        .collect()
}
