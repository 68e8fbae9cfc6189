//! Built-in mood catalog.
//!
//! A mood frames the current turn only: its `system_context` is merged into
//! the outgoing user entry and never stored in history.

/// Situational framing selected by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodContext {
    /// Stable identifier (e.g. `"anxious"`).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Display emoji.
    pub emoji: String,
    /// Instruction describing how to respond in this mood.
    pub system_context: String,
}

impl MoodContext {
    /// Create a mood.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        emoji: impl Into<String>,
        system_context: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            emoji: emoji.into(),
            system_context: system_context.into(),
        }
    }
}

/// Identifier of the mood used when none is chosen.
pub const DEFAULT_MOOD_ID: &str = "neutral";

/// All built-in moods, default first.
pub fn builtin_moods() -> Vec<MoodContext> {
    vec![
        MoodContext::new(
            "neutral",
            "Tranquilo / Normal",
            "🧘",
            "El usuario se siente neutral. Mantené tu personalidad estándar: amable, \
             relajada y profesional. Preguntale cómo viene su día.",
        ),
        MoodContext::new(
            "sad",
            "Triste / Bajón",
            "🌧️",
            "El usuario se siente triste o bajoneado. Sé extremadamente suave, empático, \
             validante y cálido. Evitá ser demasiado energético. Usá un tono contenedor.",
        ),
        MoodContext::new(
            "anxious",
            "Ansioso / Estresado",
            "⚡",
            "El usuario siente ansiedad o estrés. Sé calmado, estructurado y ayudalo a \
             respirar. Usá frases cortas y tranquilizadoras. Transmití paz.",
        ),
        MoodContext::new(
            "angry",
            "Enojado / Frustrado",
            "🔥",
            "El usuario siente enojo, bronca o frustración. No lo juzgues. Escuchalo \
             activamente. NUNCA digas \"calmate\". Validá su bronca (\"Entiendo que te dé bronca\").",
        ),
        MoodContext::new(
            "happy",
            "Motivado / Bien",
            "✨",
            "El usuario se siente bien o motivado. ¡Celebralo! Sé entusiasta y reforzá esa \
             energía positiva.",
        ),
    ]
}

/// Look up a built-in mood by id, ignoring case.
pub fn find_mood(id: &str) -> Option<MoodContext> {
    let wanted = id.trim();
    builtin_moods()
        .into_iter()
        .find(|mood| mood.id.eq_ignore_ascii_case(wanted))
}
