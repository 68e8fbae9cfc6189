//! Instruction extraction guard.
//!
//! Flags messages that try to read or override the persona instructions.
//! A positive match is a hard stop: the orchestrator answers with
//! [`DEFLECTION_REPLY`] and never builds a prompt.

/// Fixed reply for guarded messages.
pub const DEFLECTION_REPLY: &str =
    "Soy IYM, tu psicólogo personal. Enfoquémonos en lo que te pasa a vos. 😊";

/// Lowercase phrases associated with prompt extraction or override.
const GUARD_PHRASES: &[&str] = &[
    "system prompt",
    "ignore all previous instructions",
    "tu configuracion interna",
    "tu configuración interna",
    "ignora todas las instrucciones",
];

/// Whether `text` contains a known instruction extraction phrase, any casing.
pub fn is_instruction_extraction_attempt(text: &str) -> bool {
    let lowered = text.to_lowercase();
    GUARD_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}
