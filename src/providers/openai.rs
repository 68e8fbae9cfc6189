//! OpenAI-compatible provider using the `/chat/completions` wire format.

use serde::{Deserialize, Serialize};

use super::{check_http_response, CompletionRequest, LlmProvider, ProviderError};

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Where and how to reach one upstream provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    /// Short provider name for logs (e.g. `"groq"`).
    pub name: String,
    /// Full chat completions URL.
    pub url: String,
    /// Model identifier sent in the request body.
    pub model: String,
    /// Bearer credential.
    pub credential: String,
}

impl std::fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEndpoint")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("model", &self.model)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<WireMessage>,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A message in chat completions format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct WireMessage {
    /// Role (`system`, `user`, `assistant`).
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// Chat completions response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response choices.
    pub choices: Vec<Choice>,
    /// Model that served the response.
    #[serde(default)]
    pub model: Option<String>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// Assistant message for this choice.
    pub message: ResponseMessage,
}

/// Assistant message in a response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// Completion text; null when the model produced none.
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Provider for any endpoint speaking the OpenAI chat completions format.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    model_spec: String,
    endpoint: ProviderEndpoint,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create a provider for `endpoint` with a fresh HTTP client.
    pub fn new(endpoint: ProviderEndpoint) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    /// Create a provider sharing an existing HTTP client.
    pub fn with_client(endpoint: ProviderEndpoint, client: reqwest::Client) -> Self {
        let model_spec = format!("{}/{}", endpoint.name, endpoint.model);
        Self {
            model_spec,
            endpoint,
            client,
        }
    }

    /// The endpoint this provider calls.
    pub fn endpoint(&self) -> &ProviderEndpoint {
        &self.endpoint
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build the wire request for `model` from a completion request.
#[doc(hidden)]
pub fn build_request(model: &str, request: &CompletionRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_owned(),
        messages: request
            .messages
            .iter()
            .map(|msg| WireMessage {
                role: msg.role.as_str().to_owned(),
                content: msg.content.clone(),
            })
            .collect(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Extract `choices[0].message.content` from a response body.
///
/// # Errors
///
/// Returns `ProviderError::Parse` when the body does not match the expected
/// shape and `ProviderError::EmptyCompletion` when the content is missing or
/// blank.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let resp: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("missing choices[0]".to_owned()))?;

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::EmptyCompletion),
    }
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let api_request = build_request(&self.endpoint.model, request);

        let response = self
            .client
            .post(&self.endpoint.url)
            .header("content-type", "application/json")
            .header(
                "authorization",
                format!("Bearer {}", self.endpoint.credential),
            )
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }

    fn model_id(&self) -> &str {
        &self.model_spec
    }
}
