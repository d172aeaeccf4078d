use crate::pwned_password::PWNED_PASSWORDS_URL;
use std::env::var;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
// Completions are slow, they get their own budget
const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid duration for {name}: '{value}'")]
    InvalidDuration { name: String, value: String },
    #[error("invalid boolean for {name}: '{value}'")]
    InvalidBool { name: String, value: String },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundationConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub pwned_passwords_url: String,
    pub http_timeout: Duration,
    pub pwned_padding: bool,
    // None means the chat assistant is not configured
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub chat_timeout: Duration,
    // None means the profile lives in memory only
    pub profile_path: Option<PathBuf>,
}

impl Default for FoundationConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
            pwned_passwords_url: PWNED_PASSWORDS_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            pwned_padding: true,
            gemini_api_key: None,
            gemini_model: GEMINI_MODEL.to_string(),
            gemini_url: GEMINI_URL.to_string(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            profile_path: None,
        }
    }
}

// Unset and blank variables are treated the same
fn non_empty_var(name: &str) -> Option<String> {
    var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_duration(name: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|_| ConfigError::InvalidDuration {
        name: name.to_string(),
        value: value.to_string(),
    })
}

impl FoundationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(level) = non_empty_var("PRIVACYGUARD_LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = non_empty_var("PRIVACYGUARD_LOG_DIR").map(PathBuf::from);
        if let Some(url) = non_empty_var("PRIVACYGUARD_PWNED_URL") {
            config.pwned_passwords_url = url;
        }
        if let Some(timeout) = non_empty_var("PRIVACYGUARD_HTTP_TIMEOUT") {
            config.http_timeout = parse_duration("PRIVACYGUARD_HTTP_TIMEOUT", &timeout)?;
        }
        if let Some(padding) = non_empty_var("PRIVACYGUARD_PWNED_PADDING") {
            config.pwned_padding = parse_bool("PRIVACYGUARD_PWNED_PADDING", &padding)?;
        }
        config.gemini_api_key = non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY"));
        if config.gemini_api_key.is_none() {
            warn!("No Gemini API key set, the chat assistant will not work");
        }
        if let Some(model) = non_empty_var("PRIVACYGUARD_GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(url) = non_empty_var("PRIVACYGUARD_GEMINI_URL") {
            config.gemini_url = url;
        }
        if let Some(timeout) = non_empty_var("PRIVACYGUARD_CHAT_TIMEOUT") {
            config.chat_timeout = parse_duration("PRIVACYGUARD_CHAT_TIMEOUT", &timeout)?;
        }
        config.profile_path = non_empty_var("PRIVACYGUARD_PROFILE_PATH").map(PathBuf::from);

        info!(
            "Configuration loaded: range service {}, timeout {}, chat {}",
            config.pwned_passwords_url,
            humantime::format_duration(config.http_timeout),
            if config.gemini_api_key.is_some() {
                "configured"
            } else {
                "unconfigured"
            }
        );

        Ok(config)
    }
}
