use crate::config::FoundationConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

pub const PWNED_PASSWORDS_URL: &str = "https://api.pwnedpasswords.com";
static TIMEOUT: Duration = Duration::from_secs(30);

// Only this many leading hex characters of the hash ever leave the process
const PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordExposureResult {
    pub is_pwned: bool,
    pub count: u64,
}

impl PasswordExposureResult {
    pub fn not_pwned() -> Self {
        Self::default()
    }

    pub fn pwned(count: u64) -> Self {
        Self {
            is_pwned: true,
            count,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PasswordCheckError {
    #[error("failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("range lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("range lookup returned HTTP status {0}")]
    Status(StatusCode),
    #[error("range lookup returned an unreadable count '{count}' for the matching suffix")]
    MalformedCount { count: String },
}

/// A SHA-1 digest split for a range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRange {
    pub prefix: String,
    pub suffix: String,
}

/// Uppercase hex SHA-1 of the exact password bytes.
pub fn sha1_hex(password: &str) -> String {
    let digest = Sha1::digest(password.as_bytes());
    hex::encode_upper(digest)
}

pub fn hash_range(password: &str) -> HashRange {
    let hash = sha1_hex(password);
    let (prefix, suffix) = hash.split_at(PREFIX_LEN);
    HashRange {
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
    }
}

/// Scan a range response body for `suffix`.
///
/// Lines without a `:` separator are skipped. A match with a count of 0 is a padding entry.
pub fn find_suffix(body: &str, suffix: &str) -> Result<PasswordExposureResult, PasswordCheckError> {
    let suffix = suffix.trim().to_uppercase();
    for (line_number, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((candidate, count)) = line.split_once(':') else {
            warn!(
                "Skipping malformed range response line {} (no separator)",
                line_number + 1
            );
            continue;
        };
        if candidate.trim().to_uppercase() != suffix {
            continue;
        }
        let count = count.trim();
        let count = count
            .parse::<u64>()
            .map_err(|_| PasswordCheckError::MalformedCount {
                count: count.to_string(),
            })?;
        return Ok(if count == 0 {
            PasswordExposureResult::not_pwned()
        } else {
            PasswordExposureResult::pwned(count)
        });
    }
    Ok(PasswordExposureResult::not_pwned())
}

/// Client for the Pwned Passwords range API.
#[derive(Debug, Clone)]
pub struct PwnedPasswordsClient {
    client: Client,
    base_url: String,
    padding: bool,
}

impl PwnedPasswordsClient {
    pub fn new() -> Result<Self, PasswordCheckError> {
        Self::build(PWNED_PASSWORDS_URL.to_string(), TIMEOUT, true)
    }

    pub fn from_config(config: &FoundationConfig) -> Result<Self, PasswordCheckError> {
        Self::build(
            config.pwned_passwords_url.clone(),
            config.http_timeout,
            config.pwned_padding,
        )
    }

    fn build(base_url: String, timeout: Duration, padding: bool) -> Result<Self, PasswordCheckError> {
        let client = Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(crate::user_agent())
            .build()
            .map_err(PasswordCheckError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            padding,
        })
    }

    /// Point the client at another range service (mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Ask the server to pad responses with fake zero-count entries.
    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn range_url(&self, prefix: &str) -> String {
        format!("{}/range/{}", self.base_url, prefix)
    }

    /// Check whether a password appears in the breach corpus.
    ///
    /// Only the first five hex characters of the SHA-1 are sent. An empty password is never
    /// considered breached and does not touch the network.
    pub async fn check_password(
        &self,
        password: &str,
    ) -> Result<PasswordExposureResult, PasswordCheckError> {
        if password.is_empty() {
            trace!("Empty password, skipping range lookup");
            return Ok(PasswordExposureResult::not_pwned());
        }

        let range = hash_range(password);
        let url = self.range_url(&range.prefix);
        debug!("Querying password range {}", range.prefix);

        let mut request = self.client.get(&url);
        if self.padding {
            request = request.header("Add-Padding", "true");
        }
        let response = request.send().await.map_err(|e| {
            error!("Range lookup for {} failed: {}", range.prefix, e);
            PasswordCheckError::Transport(e)
        })?;

        if !response.status().is_success() {
            error!(
                "Range lookup for {} returned HTTP status {}",
                range.prefix,
                response.status()
            );
            return Err(PasswordCheckError::Status(response.status()));
        }

        let body = response.text().await?;
        let result = find_suffix(&body, &range.suffix)?;
        debug!(
            "Range {} checked, exposed: {}",
            range.prefix, result.is_pwned
        );
        Ok(result)
    }
}
