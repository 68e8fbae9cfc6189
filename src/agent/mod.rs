//! Conversation pipeline: mood framing, prompt composition, response
//! cleanup, offline fallback, the per-turn orchestrator and the session that
//! owns a conversation's history.
//!
//! The [`Orchestrator`] is stateless across calls; [`ChatSession`] is the
//! stateful caller that serializes turns for one conversation.

pub mod composer;
pub mod fallback;
pub mod mood;
pub mod orchestrator;
pub mod sanitizer;
pub mod session;

pub use composer::PromptComposer;
pub use fallback::FallbackResponder;
pub use mood::{builtin_moods, find_mood, MoodContext};
pub use orchestrator::Orchestrator;
pub use sanitizer::sanitize;
pub use session::{ChatSession, SessionError, LOST_CONNECTION_REPLY};
