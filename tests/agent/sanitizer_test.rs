//! Response sanitizer tests.

use iym::agent::sanitize;

#[test]
fn strips_leading_role_label_any_case() {
    assert_eq!(sanitize("IYM: Hola, ¿cómo estás?"), "Hola, ¿cómo estás?");
    assert_eq!(sanitize("assistant: Todo bien."), "Todo bien.");
    assert_eq!(sanitize("Ai:Contame más."), "Contame más.");
}

#[test]
fn role_label_only_stripped_at_start() {
    assert_eq!(sanitize("Dije IYM: hola."), "Dije IYM: hola.");
}

#[test]
fn removes_emphasis_markup() {
    assert_eq!(sanitize("Es **muy** __importante__."), "Es muy importante.");
}

#[test]
fn appends_period_when_no_sentence_mark() {
    assert_eq!(sanitize("Hola como estas"), "Hola como estas.");
}

#[test]
fn appends_period_when_last_mark_is_early() {
    // 11 chars, '.' at index 4: 4/11 is not past 70 %
    assert_eq!(sanitize("Bien. Y vos"), "Bien. Y vos.");
}

#[test]
fn truncates_after_late_sentence_mark() {
    assert_eq!(sanitize("Estoy bien. Gracias! y"), "Estoy bien. Gracias!");
}

#[test]
fn exactly_seventy_percent_appends() {
    // len 20, mark at index 14: 14/20 == 0.7, not strictly past
    assert_eq!(sanitize("abcdefghijklmn.opqrs"), "abcdefghijklmn.opqrs.");
}

#[test]
fn just_past_seventy_percent_truncates() {
    // len 20, mark at index 15
    assert_eq!(sanitize("abcdefghijklmno.pqrs"), "abcdefghijklmno.");
}

#[test]
fn ten_chars_or_fewer_untouched() {
    assert_eq!(sanitize("  hola che  "), "hola che");
    assert_eq!(sanitize("abcdefghij"), "abcdefghij");
    assert_eq!(sanitize("abcdefghijk"), "abcdefghijk.");
}

#[test]
fn already_terminated_text_kept() {
    assert_eq!(sanitize("¿Querés contarme más?"), "¿Querés contarme más?");
    assert_eq!(sanitize("¡Qué bueno!"), "¡Qué bueno!");
}

#[test]
fn label_only_reply_becomes_empty() {
    assert_eq!(sanitize("IYM:   "), "");
}
