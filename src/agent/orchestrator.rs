//! Message dispatch orchestration.
//!
//! [`Orchestrator::get_reply`] sequences one turn:
//! guard → crisis detection → composition → dispatch → finalization.
//! It holds no per-call mutable state, so one instance can be shared behind
//! an `Arc` by any number of callers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::Config;
use crate::conversation::ConversationMessage;
use crate::credentials::Credentials;
use crate::providers::dispatcher::{DispatchOutcome, Dispatcher};
use crate::providers::openai::OpenAiCompatibleProvider;
use crate::providers::LlmProvider;
use crate::safety::{
    is_instruction_extraction_attempt, CrisisCatalog, CrisisCategory, DEFLECTION_REPLY,
};

use super::composer::PromptComposer;
use super::fallback::FallbackResponder;
use super::mood::MoodContext;
use super::sanitizer::sanitize;

/// Pipeline stage, recorded in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No call in progress.
    Idle,
    /// Screening for instruction extraction.
    Guarding,
    /// Building the provider payload.
    Composing,
    /// Waiting on providers.
    Dispatching,
    /// Sanitizing and merging safety banners.
    Finalizing,
}

impl Stage {
    /// Lowercase name for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Guarding => "guarding",
            Self::Composing => "composing",
            Self::Dispatching => "dispatching",
            Self::Finalizing => "finalizing",
        }
    }
}

/// Directive banner for imminent-risk messages.
pub fn urgent_banner(category: &CrisisCategory) -> String {
    format!(
        "🚨 URGENTE: Llamá al {} ({}) AHORA. Mientras tanto, contame qué te está pasando.",
        category.emergency_number, category.name
    )
}

/// Informational line for non-urgent crisis topics.
pub fn info_line(category: &CrisisCategory) -> String {
    format!(
        "Te doy el {} ({}) - {}.",
        category.emergency_number, category.name, category.short_description
    )
}

/// Turns a raw user message into a safe, displayable reply.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    dispatcher: Dispatcher,
    composer: PromptComposer,
    catalog: CrisisCatalog,
    fallback: FallbackResponder,
}

impl Orchestrator {
    /// Assemble an orchestrator from its parts.
    pub fn new(
        dispatcher: Dispatcher,
        composer: PromptComposer,
        catalog: CrisisCatalog,
        fallback: FallbackResponder,
    ) -> Self {
        Self {
            dispatcher,
            composer,
            catalog,
            fallback,
        }
    }

    /// Orchestrator over `providers` with built-in persona, catalog and
    /// fallback replies.
    pub fn with_providers(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self::new(
            Dispatcher::new(providers),
            PromptComposer::default(),
            CrisisCatalog::builtin(),
            FallbackResponder::default(),
        )
    }

    /// Build from loaded configuration and credentials.
    ///
    /// Providers without a credential are skipped; with none left every
    /// reply comes from the fallback catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the persona file cannot be read.
    pub fn from_config(config: &Config, credentials: &Credentials) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let providers: Vec<Arc<dyn LlmProvider>> = config
            .resolve_endpoints(credentials)
            .into_iter()
            .map(|endpoint| {
                Arc::new(OpenAiCompatibleProvider::with_client(endpoint, client.clone()))
                    as Arc<dyn LlmProvider>
            })
            .collect();
        if providers.is_empty() {
            warn!("no providers available, replies will use the offline fallback");
        }

        let dispatcher = Dispatcher::new(providers)
            .with_attempt_timeout(Duration::from_secs(config.dispatch.attempt_timeout_secs))
            .with_sampling(config.dispatch.max_tokens, config.dispatch.temperature);

        let mut composer =
            PromptComposer::new().with_history_window(config.conversation.history_window);
        if let Some(persona) = config.persona_override()? {
            composer = composer.with_persona(persona);
        }

        Ok(Self::new(
            dispatcher,
            composer,
            config.crisis_catalog(),
            FallbackResponder::new(config.conversation.fallback_replies.clone()),
        ))
    }

    /// Crisis catalog in use.
    pub fn catalog(&self) -> &CrisisCatalog {
        &self.catalog
    }

    /// Produce the reply for `user_text`.
    ///
    /// `history` holds prior turns, oldest first, excluding `user_text`; it
    /// is never modified. Never fails: provider errors degrade to the
    /// fallback catalog.
    pub async fn get_reply(
        &self,
        history: &[ConversationMessage],
        user_text: &str,
        mood: Option<&MoodContext>,
    ) -> String {
        let call_id = uuid::Uuid::new_v4();
        let span = info_span!("get_reply", %call_id, mood = mood.map(|m| m.id.as_str()));
        self.run(history, user_text, mood).instrument(span).await
    }

    async fn run(
        &self,
        history: &[ConversationMessage],
        user_text: &str,
        mood: Option<&MoodContext>,
    ) -> String {
        debug!(stage = Stage::Guarding.as_str(), "screening message");
        if is_instruction_extraction_attempt(user_text) {
            info!("instruction extraction attempt deflected");
            return DEFLECTION_REPLY.to_owned();
        }

        let crises = self.catalog.detect(user_text);
        let urgent = self.catalog.is_urgent(user_text);
        let banner = if urgent {
            crises
                .first()
                .copied()
                .or_else(|| self.catalog.urgent_contact())
                .map(urgent_banner)
        } else {
            None
        };
        if !crises.is_empty() || urgent {
            let keys: Vec<&str> = crises.iter().map(|c| c.key.as_str()).collect();
            warn!(categories = ?keys, urgent, "crisis keywords detected");
        }

        debug!(
            stage = Stage::Composing.as_str(),
            history = history.len(),
            "composing payload"
        );
        let payload = self.composer.compose(mood, &crises, history, user_text);

        debug!(
            stage = Stage::Dispatching.as_str(),
            providers = self.dispatcher.provider_count(),
            "dispatching"
        );
        let outcome = self.dispatcher.dispatch(payload).await;

        debug!(stage = Stage::Finalizing.as_str(), "finalizing reply");
        let mut reply = match outcome {
            DispatchOutcome::Success(raw) => {
                let cleaned = sanitize(&raw);
                if cleaned.is_empty() {
                    warn!("completion was empty after sanitizing, using fallback");
                    self.fallback.pick()
                } else {
                    cleaned
                }
            }
            DispatchOutcome::Failure => self.fallback.pick(),
        };

        if !urgent {
            if let Some(primary) = crises.first() {
                if !reply.contains(primary.emergency_number.as_str()) {
                    reply = format!("{}\n\n{reply}", info_line(primary));
                }
            }
        }
        if let Some(banner) = banner {
            reply = format!("{banner}\n\n{reply}");
        }

        debug!(stage = Stage::Idle.as_str(), "turn complete");
        reply
    }
}
