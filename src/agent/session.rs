//! Caller-side conversation owner.
//!
//! A [`ChatSession`] keeps one conversation's history and active mood,
//! allows a single outstanding turn at a time, and runs each turn in its own
//! task so an unexpected panic becomes an ordinary reply.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::conversation::ConversationMessage;

use super::mood::MoodContext;
use super::orchestrator::Orchestrator;

/// Reply shown when a turn fails unexpectedly.
pub const LOST_CONNECTION_REPLY: &str =
    "Me desconecté un segundo del universo. ¿Me lo repetís? 😅";

/// Session-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Another turn is still in progress.
    #[error("a reply is already in progress")]
    Busy,
}

#[derive(Debug, Default)]
struct SessionState {
    history: Vec<ConversationMessage>,
    mood: Option<MoodContext>,
}

/// One conversation with a shared orchestrator.
#[derive(Debug, Clone)]
pub struct ChatSession {
    orchestrator: Arc<Orchestrator>,
    initial_mood: Option<MoodContext>,
    state: Arc<Mutex<SessionState>>,
    turn: Arc<Mutex<()>>,
}

impl ChatSession {
    /// Start an empty conversation in `mood`.
    pub fn new(orchestrator: Arc<Orchestrator>, mood: Option<MoodContext>) -> Self {
        Self {
            orchestrator,
            initial_mood: mood.clone(),
            state: Arc::new(Mutex::new(SessionState {
                history: Vec::new(),
                mood,
            })),
            turn: Arc::new(Mutex::new(())),
        }
    }

    /// Send one user message and return the reply.
    ///
    /// Both the message and the reply are appended to history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] without touching history when a
    /// previous turn has not finished.
    pub async fn send(&self, text: &str) -> Result<String, SessionError> {
        let _turn = Arc::clone(&self.turn)
            .try_lock_owned()
            .map_err(|_| SessionError::Busy)?;

        let (history, mood) = {
            let state = self.state.lock().await;
            (state.history.clone(), state.mood.clone())
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let user_text = text.to_owned();
        let task = tokio::spawn(async move {
            orchestrator
                .get_reply(&history, &user_text, mood.as_ref())
                .await
        });

        let reply = match task.await {
            Ok(reply) => reply,
            Err(join_error) => {
                error!(error = %join_error, "reply task failed");
                LOST_CONNECTION_REPLY.to_owned()
            }
        };

        let mut state = self.state.lock().await;
        state
            .history
            .push(ConversationMessage::user(text).stamped_now());
        state
            .history
            .push(ConversationMessage::assistant(reply.clone()).stamped_now());
        Ok(reply)
    }

    /// Switch the active mood and note the change in history.
    ///
    /// Waits for an in-flight turn, so the note follows that turn's entries.
    pub async fn set_mood(&self, mood: MoodContext) {
        let _turn = self.turn.lock().await;
        info!(mood = %mood.id, "mood changed");
        let mut state = self.state.lock().await;
        state.history.push(
            ConversationMessage::system(format!("Ambiente cambiado a: {}", mood.label))
                .stamped_now(),
        );
        state.mood = Some(mood);
    }

    /// Active mood, if any.
    pub async fn mood(&self) -> Option<MoodContext> {
        self.state.lock().await.mood.clone()
    }

    /// Snapshot of the conversation so far.
    pub async fn history(&self) -> Vec<ConversationMessage> {
        self.state.lock().await.history.clone()
    }

    /// Clear history and restore the starting mood.
    ///
    /// Waits for an in-flight turn to finish first.
    pub async fn reset(&self) {
        let _turn = self.turn.lock().await;
        let mut state = self.state.lock().await;
        state.history.clear();
        state.mood = self.initial_mood.clone();
    }
}
