//! LLM provider abstraction layer.
//!
//! Defines the [`LlmProvider`] trait and the shared request types used by the
//! dispatcher.
//!
//! - [`openai::OpenAiCompatibleProvider`] — any `/chat/completions` endpoint
//!   speaking the OpenAI wire format (Fireworks, Groq, ...)
//! - [`dispatcher::Dispatcher`] — ordered failover across providers with a
//!   per-attempt timeout

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;

use crate::conversation::{ConversationMessage, Role};

pub mod dispatcher;
pub mod openai;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// A role-tagged instruction sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Create a system instruction.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

impl From<&ConversationMessage> for Message {
    fn from(msg: &ConversationMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// A request to a provider for a single completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full composed payload: system entry, history window, current turn.
    pub messages: Vec<Message>,
    /// Token ceiling for the completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by model providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match the expected schema.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The provider answered but the completion text was missing or empty.
    #[error("provider returned an empty completion")]
    EmptyCompletion,
    /// The attempt exceeded its time budget.
    #[error("provider attempt timed out after {0} ms")]
    Timeout(u128),
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact credential-looking tokens and cap the length
/// of an upstream error body before it is logged.
pub fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"fw_[A-Za-z0-9]{16,}",
        r"gsk_[A-Za-z0-9]{20,}",
        r"sk-[A-Za-z0-9_\-]{20,}",
        r"Bearer\s+[A-Za-z0-9_\-\.]{12,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Core LLM provider interface.
///
/// Implementations must be `Send + Sync` so a single orchestrator can be
/// shared across tasks.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Request a completion and return its raw text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport, status, parse failure or an
    /// empty completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Identifier used in logs (usually `name/model`).
    fn model_id(&self) -> &str;
}
