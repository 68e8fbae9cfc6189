//! Ordered provider failover with a hard per-attempt time limit.
//!
//! Providers are tried one at a time in priority order. The first attempt
//! that returns a non-empty completion before its deadline wins; every other
//! outcome is logged and the next provider is tried. No retries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{CompletionRequest, LlmProvider, Message, ProviderError};

/// Default per-attempt time limit.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(8);
/// Default completion token ceiling.
pub const DEFAULT_MAX_TOKENS: u32 = 800;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Result of one dispatch across the provider list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Raw completion text from the first provider that answered.
    Success(String),
    /// Every provider failed or the list was empty.
    Failure,
}

/// Sequential failover dispatcher.
#[derive(Clone)]
pub struct Dispatcher {
    providers: Vec<Arc<dyn LlmProvider>>,
    attempt_timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "providers",
                &self
                    .providers
                    .iter()
                    .map(|p| p.model_id())
                    .collect::<Vec<_>>(),
            )
            .field("attempt_timeout", &self.attempt_timeout)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher with the default limits.
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self {
            providers,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the per-attempt time limit.
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Override the token ceiling and temperature.
    #[must_use]
    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Number of configured providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Per-attempt time limit.
    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Try each provider in order until one returns a completion.
    ///
    /// Worst case wall time is `provider_count() * attempt_timeout()`.
    pub async fn dispatch(&self, messages: Vec<Message>) -> DispatchOutcome {
        let request = CompletionRequest {
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        for (attempt, provider) in self.providers.iter().enumerate() {
            let model = provider.model_id();
            let started = Instant::now();
            debug!(model, attempt, "dispatching completion request");

            let attempt_result =
                tokio::time::timeout(self.attempt_timeout, provider.complete(&request)).await;
            let result = match attempt_result {
                Ok(inner) => inner,
                Err(_) => Err(ProviderError::Timeout(self.attempt_timeout.as_millis())),
            };
            let elapsed_ms = started.elapsed().as_millis();

            match result {
                Ok(text) if !text.trim().is_empty() => {
                    info!(model, attempt, elapsed_ms, "provider answered");
                    return DispatchOutcome::Success(text);
                }
                Ok(_) => {
                    warn!(
                        model,
                        attempt,
                        elapsed_ms,
                        error = %ProviderError::EmptyCompletion,
                        "provider attempt failed, trying next"
                    );
                }
                Err(error) => {
                    warn!(
                        model,
                        attempt,
                        elapsed_ms,
                        error = %error,
                        "provider attempt failed, trying next"
                    );
                }
            }
        }

        warn!(providers = self.providers.len(), "all providers failed");
        DispatchOutcome::Failure
    }
}
