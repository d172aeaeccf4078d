//! Breach-aware chat assistant
//!
//! The conversation logic lives in an external text-completion service. This module owns the
//! conversation history value, the prompt context built from scan results, and the fallback
//! strings shown when the service is missing or failing.
//!
//! Key principles:
//! - The caller owns the history and its retention, nothing is kept between requests
//! - The queried identifier and other PII never go into the prompt context
//! - Failures never propagate, the user always gets a displayable string

use crate::breach::BreachRecord;
use crate::config::FoundationConfig;
use crate::risk::RiskAssessment;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

pub const ASSISTANT_UNAVAILABLE: &str =
    "The AI assistant is currently unavailable. Please ensure the API key is configured.";
pub const ASSISTANT_ERROR: &str = "Sorry, I encountered an error. Please try again later.";
pub const ASSISTANT_GREETING: &str = "Hello! I am your AI Privacy Assistant. How can I help you understand your data exposure or improve your online security today?";

pub const SYSTEM_INSTRUCTION: &str = "You are PrivacyGuard AI, a friendly and expert cybersecurity assistant. Your goal is to help users understand data breaches and improve their online privacy. Explain complex topics simply. Be encouraging and provide actionable advice. Do not mention that you are a language model. Keep responses concise and helpful.";

static TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
        }
    }
}

/// Ordered conversation, oldest message first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History opened by the assistant greeting.
    pub fn with_greeting() -> Self {
        let mut history = Self::new();
        history.push_assistant(ASSISTANT_GREETING);
        history
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(ChatRole::User, text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages
            .push(ChatMessage::new(ChatRole::Assistant, text));
    }

    /// Keep only the `count` most recent messages.
    pub fn truncate_to_last(&mut self, count: usize) {
        if self.messages.len() > count {
            self.messages.drain(..self.messages.len() - count);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CompletionError {
    #[error("failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion service returned HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion service returned no text")]
    EmptyResponse,
}

/// External text-completion collaborator.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, CompletionError>;
}

/// Gemini `generateContent` backend.
pub struct GeminiCompletion {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiCompletion {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, CompletionError> {
        Self::build(api_key.into(), model.into(), TIMEOUT)
    }

    fn build(api_key: String, model: String, timeout: Duration) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(crate::user_agent())
            .build()
            .map_err(CompletionError::Client)?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: crate::config::GEMINI_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn to_gemini_request(
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: m.text.clone(),
                }],
            })
            .collect();
        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: message.to_string(),
            }],
        });

        GeminiRequest {
            contents,
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system_instruction.to_string(),
                }],
            },
        }
    }
}

#[async_trait]
impl TextCompletion for GeminiCompletion {
    async fn complete(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, CompletionError> {
        let request = Self::to_gemini_request(system_instruction, history, message);
        debug!(model = %self.model, messages = history.len(), "Sending chat request to Gemini");

        let response = self
            .client
            .post(self.build_url())
            .json(&request)
            .send()
            .await
            // The URL carries the API key
            .map_err(|e| CompletionError::Transport(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Transport(e.without_url()))?;
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Compact, PII-free description of scan results for the prompt.
///
/// Excludes: the queried identifier, breach descriptions
/// Includes: breach names, domains, years, exposed data classes, risk level and score
pub fn sanitize_breaches_for_llm(breaches: &[BreachRecord], risk: &RiskAssessment) -> String {
    let breaches: Vec<_> = breaches
        .iter()
        .map(|b| {
            json!({
                "name": b.name,
                "domain": b.domain,
                "breach_date": b.breach_date.to_string(),
                "data_classes": b.data_classes,
            })
        })
        .collect();
    json!({
        "risk_level": risk.level().to_string(),
        "risk_score": risk.score(),
        "breaches": breaches,
    })
    .to_string()
}

pub struct ChatAssistant {
    backend: Option<Arc<dyn TextCompletion>>,
    system_instruction: String,
}

impl ChatAssistant {
    pub fn new(backend: Arc<dyn TextCompletion>) -> Self {
        Self {
            backend: Some(backend),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            backend: None,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    /// Gemini-backed assistant when a key is configured, unconfigured otherwise.
    pub fn from_config(config: &FoundationConfig) -> Result<Self, CompletionError> {
        match &config.gemini_api_key {
            Some(api_key) => {
                let backend = GeminiCompletion::build(
                    api_key.clone(),
                    config.gemini_model.clone(),
                    config.chat_timeout,
                )?
                .with_base_url(config.gemini_url.clone());
                Ok(Self::new(Arc::new(backend)))
            }
            None => Ok(Self::unconfigured()),
        }
    }

    /// Make the assistant aware of the user's latest scan.
    pub fn with_breach_context(mut self, breaches: &[BreachRecord], risk: &RiskAssessment) -> Self {
        self.system_instruction = format!(
            "{}\n\nThe user's latest breach scan results: {}",
            SYSTEM_INSTRUCTION,
            sanitize_breaches_for_llm(breaches, risk)
        );
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Answer `message` given the prior conversation. Never fails.
    pub async fn respond(&self, history: &ChatHistory, message: &str) -> String {
        let Some(backend) = &self.backend else {
            warn!("Chat assistant called without a configured backend");
            return ASSISTANT_UNAVAILABLE.to_string();
        };
        match backend
            .complete(&self.system_instruction, history.messages(), message)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Chat completion failed: {}", e);
                ASSISTANT_ERROR.to_string()
            }
        }
    }
}

// === Gemini API Types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiContent,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}
