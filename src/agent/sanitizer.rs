//! Post-processing of raw completion text.
//!
//! Removes role-label echoes and emphasis markup, then repairs a reply that
//! was cut off mid-sentence: keep everything up to the last sentence mark
//! when that mark sits in the final 30 % of the text, otherwise close the
//! sentence with a period.

use std::sync::LazyLock;

use regex::Regex;

static ROLE_ECHO: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:iym|assistant|ai):").ok());

const SENTENCE_MARKS: [char; 3] = ['.', '!', '?'];

/// Replies at or below this many characters are never repaired.
const MIN_REPAIR_CHARS: usize = 10;

/// Normalize a raw completion for display.
pub fn sanitize(raw: &str) -> String {
    let stripped = match ROLE_ECHO.as_ref() {
        Some(regex) => regex.replace(raw, "").into_owned(),
        None => raw.to_owned(),
    };
    let unmarked = stripped.replace("**", "").replace("__", "");
    repair_ending(unmarked.trim())
}

fn repair_ending(text: &str) -> String {
    let len = text.chars().count();
    if len <= MIN_REPAIR_CHARS || text.ends_with(SENTENCE_MARKS) {
        return text.to_owned();
    }

    let last_mark = text
        .chars()
        .enumerate()
        .filter(|(_, c)| SENTENCE_MARKS.contains(c))
        .map(|(idx, _)| idx)
        .last();

    match last_mark {
        // idx / len > 0.7 without floats
        Some(idx) if idx.saturating_mul(10) > len.saturating_mul(7) => {
            text.chars().take(idx.saturating_add(1)).collect()
        }
        _ => format!("{text}."),
    }
}
