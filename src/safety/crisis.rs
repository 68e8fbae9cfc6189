//! Crisis category catalog and detection.
//!
//! Matching is case-insensitive substring containment against each
//! category's keyword list. Categories are reported in declaration order;
//! the first match is the primary category.

use serde::Deserialize;

/// A named class of sensitive topic with its emergency contact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrisisCategory {
    /// Stable identifier (e.g. `"adicciones"`).
    pub key: String,
    /// Emergency line to surface to the user.
    pub emergency_number: String,
    /// Human-readable name of the line.
    pub name: String,
    /// One-line description of the service.
    pub short_description: String,
    /// Lowercase phrases that place a message in this category.
    pub keywords: Vec<String>,
}

impl CrisisCategory {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw.as_str()))
    }
}

/// Ordered crisis categories plus the imminent-risk keyword subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisCatalog {
    categories: Vec<CrisisCategory>,
    urgent_keywords: Vec<String>,
}

impl Default for CrisisCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CrisisCatalog {
    /// Build a catalog, normalizing every keyword to lowercase.
    ///
    /// Empty keywords are dropped; they would otherwise match every message.
    pub fn new(categories: Vec<CrisisCategory>, urgent_keywords: Vec<String>) -> Self {
        let categories = categories
            .into_iter()
            .map(|mut category| {
                category.keywords = normalize_keywords(category.keywords);
                category
            })
            .collect();
        Self {
            categories,
            urgent_keywords: normalize_keywords(urgent_keywords),
        }
    }

    /// The built-in Argentine catalog.
    pub fn builtin() -> Self {
        let categories = vec![
            category(
                "suicidio",
                "135",
                "Prevención del Suicidio",
                "Asistencia 24hs",
                &[
                    "suicidio",
                    "matarme",
                    "quitarme la vida",
                    "no quiero vivir",
                    "quiero morir",
                    "acabar con todo",
                ],
            ),
            category(
                "adicciones",
                "141",
                "Adicciones (SEDRONAR)",
                "Orientación 24hs",
                &[
                    "drogas",
                    "cocaína",
                    "marihuana",
                    "pastillas",
                    "alcohol",
                    "adicto",
                    "consumo",
                ],
            ),
            category(
                "violencia",
                "144",
                "Violencia de Género",
                "Contención 24hs",
                &[
                    "violencia",
                    "golpes",
                    "maltrato",
                    "violencia de género",
                    "abuso",
                ],
            ),
            category(
                "autolesion",
                "135",
                "Crisis Emocional",
                "Asistencia crisis",
                &["cortarme", "lastimarme", "hacerme daño", "autolesión"],
            ),
            category(
                "medica",
                "107",
                "SAME",
                "Emergencias Médicas",
                &["ambulancia", "emergencia médica", "accidente"],
            ),
        ];

        let urgent = [
            "suicidio",
            "matarme",
            "quitarme la vida",
            "cortarme",
            "acabar con todo",
            "quiero morir",
            "no quiero vivir",
        ];

        Self::new(categories, urgent.iter().map(|kw| (*kw).to_owned()).collect())
    }

    /// All categories in declaration order.
    pub fn categories(&self) -> &[CrisisCategory] {
        &self.categories
    }

    /// The imminent-risk keywords.
    pub fn urgent_keywords(&self) -> &[String] {
        &self.urgent_keywords
    }

    /// Every category with at least one keyword contained in `text`.
    pub fn detect(&self, text: &str) -> Vec<&CrisisCategory> {
        let lowered = text.to_lowercase();
        self.categories
            .iter()
            .filter(|category| category.matches(&lowered))
            .collect()
    }

    /// Whether `text` contains direct imminent-risk phrasing.
    pub fn is_urgent(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.urgent_keywords
            .iter()
            .any(|kw| lowered.contains(kw.as_str()))
    }

    /// Contact used for an urgent message that matched no category.
    pub fn urgent_contact(&self) -> Option<&CrisisCategory> {
        self.categories.first()
    }

    /// One entry per distinct emergency number, first declaration wins.
    pub fn emergency_directory(&self) -> Vec<&CrisisCategory> {
        let mut seen: Vec<&str> = Vec::new();
        let mut directory = Vec::new();
        for category in &self.categories {
            if !seen.contains(&category.emergency_number.as_str()) {
                seen.push(category.emergency_number.as_str());
                directory.push(category);
            }
        }
        directory
    }
}

fn category(
    key: &str,
    number: &str,
    name: &str,
    description: &str,
    keywords: &[&str],
) -> CrisisCategory {
    CrisisCategory {
        key: key.to_owned(),
        emergency_number: number.to_owned(),
        name: name.to_owned(),
        short_description: description.to_owned(),
        keywords: keywords.iter().map(|kw| (*kw).to_owned()).collect(),
    }
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .collect()
}
