//! Crisis detection tests against the built-in catalog.

use iym::safety::CrisisCatalog;

fn keys(catalog: &CrisisCatalog, text: &str) -> Vec<String> {
    catalog
        .detect(text)
        .into_iter()
        .map(|c| c.key.clone())
        .collect()
}

#[test]
fn detects_single_category_case_insensitively() {
    let catalog = CrisisCatalog::builtin();
    assert_eq!(keys(&catalog, "Tomo PASTILLAS todas las noches"), vec!["adicciones"]);
}

#[test]
fn multiple_categories_follow_declaration_order() {
    let catalog = CrisisCatalog::builtin();
    assert_eq!(
        keys(&catalog, "hubo golpes y después quise matarme"),
        vec!["suicidio", "violencia"]
    );
}

#[test]
fn plain_message_matches_nothing() {
    let catalog = CrisisCatalog::builtin();
    assert!(catalog.detect("hoy fue un buen día").is_empty());
    assert!(!catalog.is_urgent("hoy fue un buen día"));
}

#[test]
fn urgency_is_independent_of_categories() {
    let catalog = CrisisCatalog::builtin();
    assert!(catalog.is_urgent("A veces pienso en el SUICIDIO"));
    assert!(catalog.is_urgent("quiero morir"));
    assert!(catalog.is_urgent("no quiero vivir más"));
    assert!(!catalog.is_urgent("tomo pastillas"));
    assert!(!catalog.is_urgent("me quiero lastimar"));
}

#[test]
fn accented_keywords_match_uppercase_input() {
    let catalog = CrisisCatalog::builtin();
    assert_eq!(keys(&catalog, "Es una EMERGENCIA MÉDICA"), vec!["medica"]);
}

#[test]
fn detection_is_idempotent() {
    let catalog = CrisisCatalog::builtin();
    let text = "consumo cocaína y quiero acabar con todo";
    assert_eq!(keys(&catalog, text), keys(&catalog, text));
    assert_eq!(catalog.is_urgent(text), catalog.is_urgent(text));
}

#[test]
fn urgent_contact_is_first_category() {
    let catalog = CrisisCatalog::builtin();
    let contact = catalog.urgent_contact().expect("builtin catalog is not empty");
    assert_eq!(contact.emergency_number, "135");
}

#[test]
fn empty_catalog_has_no_contact() {
    let catalog = CrisisCatalog::new(Vec::new(), vec!["auxilio".to_owned()]);
    assert!(catalog.urgent_contact().is_none());
    assert!(catalog.is_urgent("auxilio"));
}
