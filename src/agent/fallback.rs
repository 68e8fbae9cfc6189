//! Canned replies used when no provider answered.

use rand::seq::SliceRandom;
use rand::Rng;

/// Built-in offline replies. Context-free on purpose: they must read well
/// after any user message.
pub const DEFAULT_FALLBACK_REPLIES: &[&str] = &[
    "Te escucho. Contame un poco más de lo que estás sintiendo.",
    "Entiendo. ¿Desde cuándo te sentís así?",
    "Lo que sentís es válido. ¿Qué fue lo que más te pesó hoy?",
    "Estoy acá con vos. Respirá hondo y seguime contando, sin apuro.",
    "Gracias por contármelo. ¿Cómo te gustaría que te acompañe ahora?",
    "Tiene sentido que te sientas así. ¿Qué creés que te ayudaría en este momento?",
];

/// Picks a canned reply uniformly at random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackResponder {
    replies: Vec<String>,
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self {
            replies: DEFAULT_FALLBACK_REPLIES
                .iter()
                .map(|reply| (*reply).to_owned())
                .collect(),
        }
    }
}

impl FallbackResponder {
    /// Responder over a custom reply list. An empty list falls back to the
    /// built-in replies.
    pub fn new(replies: Vec<String>) -> Self {
        if replies.is_empty() {
            return Self::default();
        }
        Self { replies }
    }

    /// Every reply this responder can return.
    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Pick a reply using the thread-local RNG.
    pub fn pick(&self) -> String {
        self.pick_with(&mut rand::thread_rng())
    }

    /// Pick a reply using the given RNG.
    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.replies
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_FALLBACK_REPLIES[0].to_owned())
    }
}
