//! Generated-text recipe parser.
//!
//! Turns the loosely formatted text a language model returns into a
//! [`RecipeDraft`]. The expected layout is:
//!
//! ```text
//! **Título:** Arroz con pollo
//! **Ingredientes:**
//! - pollo
//! - arroz
//! **Instrucciones:**
//! 1. Cocer el arroz
//! 2. Añadir el pollo
//! ```
//!
//! Parsing is best-effort and never fails: lines that fit no rule are
//! dropped, and missing sections come back as the placeholder title or
//! empty lists.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{RecipeDraft, PLACEHOLDER_TITLE};

/// Section headers may be wrapped in emphasis markers (`*`, `**`, `_` or `__`),
/// with the colon inside or outside the markers: `**Label:**`, `*Label*:`, `__Label :__`.
static TITLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\*\*?|__?)?t[ií]tulo(?:\*\*?|__?)?\s*:(?:\*\*?|__?)?").unwrap()
});
static INGREDIENTS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\*\*?|__?)?ingredientes(?:\*\*?|__?)?\s*:").unwrap());
static INSTRUCTIONS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\*\*?|__?)?instrucciones(?:\*\*?|__?)?\s*:").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+").unwrap());
static NUMBERED_STEP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Which content section subsequent lines belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Ingredients,
    Instructions,
}

/// What a single line means, given the section it appears in.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Title(&'a str),
    IngredientsHeader,
    InstructionsHeader,
    Ingredient(&'a str),
    Step(&'a str),
    Ignored,
}

/// Classify one trimmed line. Rules are tried in order; the first match wins.
fn classify(line: &str, section: Section) -> Line<'_> {
    if let Some(m) = TITLE_HEADER.find(line) {
        return Line::Title(line[m.end()..].trim());
    }
    if INGREDIENTS_HEADER.is_match(line) {
        return Line::IngredientsHeader;
    }
    if INSTRUCTIONS_HEADER.is_match(line) {
        return Line::InstructionsHeader;
    }
    match section {
        Section::Ingredients => match BULLET.find(line) {
            Some(m) => Line::Ingredient(line[m.end()..].trim()),
            None => Line::Ignored,
        },
        Section::Instructions => match NUMBERED_STEP.find(line) {
            Some(m) => Line::Step(line[m.end()..].trim()),
            None => Line::Ignored,
        },
        Section::None => Line::Ignored,
    }
}

/// Parse generated recipe text into a draft.
pub fn parse_recipe(text: &str) -> RecipeDraft {
    let mut title: Option<String> = None;
    let mut ingredients = Vec::new();
    let mut instructions = Vec::new();
    let mut section = Section::None;

    let lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    for line in lines {
        match classify(line, section) {
            Line::Title(value) => {
                // A later non-empty title wins; an empty one keeps what we have.
                if !value.is_empty() {
                    title = Some(value.to_string());
                }
                section = Section::None;
            }
            Line::IngredientsHeader => section = Section::Ingredients,
            Line::InstructionsHeader => section = Section::Instructions,
            Line::Ingredient(value) if !value.is_empty() => ingredients.push(value.to_string()),
            Line::Step(value) if !value.is_empty() => instructions.push(value.to_string()),
            _ => {}
        }
    }

    RecipeDraft {
        title: title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
        ingredients,
        instructions,
    }
}
