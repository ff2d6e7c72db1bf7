//! Voice command interpretation
//!
//! Turns recognised Spanish speech such as "buscar recetas fáciles de pollo
//! para la cena" into filter values: a category, a difficulty tier and the
//! residual free-text query.
//!
//! Keyword tables are scanned in order and the last matching entry wins on
//! each axis. Matching is plain substring containment on the lowercased text,
//! so "postres" also matches "postre" and "intermedia" also matches "media".

use recetario_common::Category;
use serde::Serialize;
use thiserror::Error;

/// Spoken terms mapped to categories, in scan order
pub const CATEGORY_KEYWORDS: [(&str, Category); 9] = [
    ("desayuno", Category::Breakfast),
    ("almuerzo", Category::Lunch),
    ("comida", Category::Lunch),
    ("cena", Category::Dinner),
    ("postre", Category::Dessert),
    ("postres", Category::Dessert),
    ("snack", Category::Snack),
    ("bebida", Category::Beverage),
    ("bebidas", Category::Beverage),
];

/// Spoken terms mapped to difficulty tiers, in scan order
pub const DIFFICULTY_KEYWORDS: [(&str, i32); 6] = [
    ("fácil", 1),
    ("facil", 1),
    ("media", 2),
    ("intermedia", 2),
    ("difícil", 3),
    ("dificil", 3),
];

/// Words removed from the residual query besides the keywords themselves
pub const FILLER_WORDS: [&str; 7] = [
    "buscar",
    "recetas",
    "receta",
    "fáciles",
    "faciles",
    "difíciles",
    "dificiles",
];

/// Filter values extracted from one utterance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoiceCommand {
    pub category: Option<Category>,
    pub difficulty: Option<i32>,
    pub query: String,
}

/// Interpret recognised text as a search command
pub fn interpret(text: &str) -> VoiceCommand {
    let lower = text.trim().to_lowercase();

    let category = CATEGORY_KEYWORDS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .last()
        .map(|(_, category)| *category);

    let difficulty = DIFFICULTY_KEYWORDS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .last()
        .map(|(_, tier)| *tier);

    VoiceCommand {
        category,
        difficulty,
        query: residual_query(&lower),
    }
}

/// Strip fillers and keywords, longest first, and collapse whitespace
fn residual_query(lower: &str) -> String {
    let mut terms: Vec<&str> = FILLER_WORDS
        .iter()
        .copied()
        .chain(CATEGORY_KEYWORDS.iter().map(|(k, _)| *k))
        .chain(DIFFICULTY_KEYWORDS.iter().map(|(k, _)| *k))
        .collect();
    // "intermedia" before "media", "postres" before "postre"
    terms.sort_by_key(|term| std::cmp::Reverse(term.chars().count()));

    let stripped = terms
        .iter()
        .fold(lower.to_string(), |text, term| text.replace(term, " "));

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Failure reported by the speech recogniser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("Timeout de red")]
    NetworkTimeout,
    #[error("Error de red")]
    Network,
    #[error("Error de audio")]
    Audio,
    #[error("Error del servidor")]
    Server,
    #[error("Error del cliente")]
    Client,
    #[error("Timeout de habla")]
    SpeechTimeout,
    #[error("No se pudo reconocer el habla")]
    NoMatch,
    #[error("Reconocedor ocupado")]
    RecognizerBusy,
    #[error("Permisos insuficientes")]
    InsufficientPermissions,
    #[error("Error desconocido")]
    Unknown(i32),
    #[error("El reconocimiento de voz no está disponible en este dispositivo")]
    Unavailable,
}

impl SpeechError {
    /// Map a recogniser error code
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => SpeechError::NetworkTimeout,
            2 => SpeechError::Network,
            3 => SpeechError::Audio,
            4 => SpeechError::Server,
            5 => SpeechError::Client,
            6 => SpeechError::SpeechTimeout,
            7 => SpeechError::NoMatch,
            8 => SpeechError::RecognizerBusy,
            9 => SpeechError::InsufficientPermissions,
            other => SpeechError::Unknown(other),
        }
    }
}

/// Interpret the outcome of one recognition session
///
/// The first alternative is used; an empty alternatives list counts as no
/// match.
pub fn interpret_recognition(
    outcome: std::result::Result<Vec<String>, SpeechError>,
) -> std::result::Result<VoiceCommand, SpeechError> {
    let alternatives = outcome?;
    let best = alternatives.first().ok_or(SpeechError::NoMatch)?;
    Ok(interpret(best))
}
