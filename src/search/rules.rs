//! Free-text interpretation rules for the search box.
//!
//! The rules are evaluated in the order of [`RULES`] and the first one that
//! produces an [`Interpretation`] wins:
//!
//! 1. amenity keywords (`"casa con piscina en surco"`)
//! 2. property-type keywords (`"departamento en miraflores"`)
//! 3. descriptive feature words (`"loft moderno"`), forwarded as `q`
//! 4. anything else is a plain location
//!
//! A phrase like `"casa en la molina"` therefore resolves as a property type
//! even though `"casa"` could name a place; callers get exactly this order.

use crate::models::PropertyType;
use tracing::debug;

/// Keyword → amenity label sent to the backend
pub const AMENITY_KEYWORDS: &[(&str, &str)] = &[
    ("piscina", "Piscina"),
    ("gimnasio", "Gimnasio"),
    ("gym", "Gimnasio"),
    ("jardín", "Jardín"),
    ("jardin", "Jardín"),
    ("terraza", "Terraza"),
    ("balcón", "Balcón"),
    ("balcon", "Balcón"),
    ("estacionamiento", "Estacionamiento"),
    ("cochera", "Estacionamiento"),
    ("ascensor", "Ascensor"),
    ("parrilla", "Parrilla"),
    ("lavandería", "Lavandería"),
    ("lavanderia", "Lavandería"),
    ("aire acondicionado", "Aire acondicionado"),
    ("seguridad", "Seguridad 24h"),
    ("wifi", "WiFi"),
];

/// Keyword → property type, checked in order; the first hit wins
pub const PROPERTY_TYPE_KEYWORDS: &[(&str, PropertyType)] = &[
    ("departamento", PropertyType::Apartment),
    ("depa", PropertyType::Apartment),
    ("apartamento", PropertyType::Apartment),
    ("casa", PropertyType::House),
    ("habitación", PropertyType::Room),
    ("habitacion", PropertyType::Room),
    ("cuarto", PropertyType::Room),
    ("monoambiente", PropertyType::Studio),
    ("estudio", PropertyType::Studio),
    ("oficina", PropertyType::Office),
    ("local", PropertyType::Commercial),
    ("terreno", PropertyType::Land),
];

/// Descriptive words that make the whole text a free-text query
pub const FEATURE_WORDS: &[&str] = &[
    "amoblado",
    "amueblado",
    "moderno",
    "vista",
    "luminoso",
    "nuevo",
    "remodelado",
    "céntrico",
    "centrico",
    "espacioso",
];

/// What a rule extracted from the text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    pub q: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub amenities: Vec<String>,
}

/// Search box text, lower-cased and split into words
#[derive(Debug)]
pub struct Phrase<'a> {
    original: &'a str,
    lowered: String,
    words: Vec<String>,
}

impl<'a> Phrase<'a> {
    pub fn new(text: &'a str) -> Self {
        let original = text.trim();
        let lowered = original.to_lowercase();
        let words = lowered
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            original,
            lowered,
            words,
        }
    }

    /// Word range covered by `keyword`, which may span several words
    fn find(&self, keyword: &str) -> Option<std::ops::Range<usize>> {
        let parts: Vec<&str> = keyword.split_whitespace().collect();
        if parts.is_empty() || parts.len() > self.words.len() {
            return None;
        }

        (0..=self.words.len() - parts.len())
            .find(|&start| {
                parts
                    .iter()
                    .enumerate()
                    .all(|(offset, part)| word_matches(&self.words[start + offset], part))
            })
            .map(|start| start..start + parts.len())
    }

    fn contains(&self, keyword: &str) -> bool {
        self.find(keyword).is_some()
    }

    /// Words following the first `en` that has something after it
    fn en_suffix(&self) -> Option<String> {
        let idx = self
            .words
            .iter()
            .position(|w| w == "en")
            .filter(|&i| i + 1 < self.words.len())?;
        Some(self.words[idx + 1..].join(" "))
    }
}

// "piscinas" matches "piscina"; "departamentos" matches "departamento"
fn word_matches(word: &str, keyword: &str) -> bool {
    word == keyword
        || word.strip_suffix('s') == Some(keyword)
        || word.strip_suffix("es") == Some(keyword)
}

/// One interpretation step; `apply` returns `None` when the rule does not fire
pub struct Rule {
    pub name: &'static str,
    apply: fn(&Phrase) -> Option<Interpretation>,
}

/// Rules in priority order
pub const RULES: &[Rule] = &[
    Rule {
        name: "amenity",
        apply: amenity_rule,
    },
    Rule {
        name: "property_type",
        apply: property_type_rule,
    },
    Rule {
        name: "feature_words",
        apply: feature_rule,
    },
    Rule {
        name: "plain_location",
        apply: plain_location_rule,
    },
];

fn amenity_rule(phrase: &Phrase) -> Option<Interpretation> {
    let mut amenities: Vec<String> = Vec::new();
    for (keyword, label) in AMENITY_KEYWORDS {
        if phrase.contains(keyword) && !amenities.iter().any(|a| a == label) {
            amenities.push(label.to_string());
        }
    }

    if amenities.is_empty() {
        return None;
    }

    Some(Interpretation {
        location: phrase.en_suffix(),
        amenities,
        ..Default::default()
    })
}

fn property_type_rule(phrase: &Phrase) -> Option<Interpretation> {
    let (span, property_type) = PROPERTY_TYPE_KEYWORDS
        .iter()
        .find_map(|(keyword, kind)| phrase.find(keyword).map(|span| (span, *kind)))?;

    let location = match phrase.en_suffix() {
        Some(place) => place,
        None => {
            let mut rest: Vec<&str> = phrase
                .words
                .iter()
                .enumerate()
                .filter(|(i, _)| !span.contains(i))
                .map(|(_, w)| w.as_str())
                .collect();
            // "casa en" while the place is still being typed
            if rest.last() == Some(&"en") {
                rest.pop();
            }
            if rest.is_empty() {
                phrase.lowered.clone()
            } else {
                rest.join(" ")
            }
        }
    };

    Some(Interpretation {
        location: Some(location),
        property_type: Some(property_type),
        ..Default::default()
    })
}

fn feature_rule(phrase: &Phrase) -> Option<Interpretation> {
    if !FEATURE_WORDS.iter().any(|word| phrase.contains(word)) {
        return None;
    }

    Some(Interpretation {
        q: Some(phrase.original.to_string()),
        ..Default::default()
    })
}

fn plain_location_rule(phrase: &Phrase) -> Option<Interpretation> {
    Some(Interpretation {
        location: Some(phrase.original.to_string()),
        ..Default::default()
    })
}

/// Run the rules over `text` and return the first interpretation
pub fn interpret(text: &str) -> Interpretation {
    let phrase = Phrase::new(text);
    if phrase.words.is_empty() {
        return Interpretation::default();
    }

    for rule in RULES {
        if let Some(interpretation) = (rule.apply)(&phrase) {
            debug!("Search text {:?} matched rule '{}'", text, rule.name);
            return interpretation;
        }
    }

    Interpretation::default()
}
