//! Text folding for loosely typed cell values
//!
//! Every function here is pure and total. Callers holding an optional value
//! pass `value.unwrap_or("")`; an absent value folds to the empty string.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folded prefix shared by both spellings of the substitute keyword
pub const SUBSTITUTE_PREFIX: &str = "remplac";

/// Marker row that receives the inserted name rows
pub const ACTIVITY_MARKER: &str = "act. jour";

/// Marker of the first row of a block
pub const HOURS_MARKER: &str = "Hor.";

/// Label of the inserted surname row
pub const NAME_LABEL: &str = "Nom";

/// Label of the inserted given-name row
pub const GIVEN_NAME_LABEL: &str = "Prénom";

static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static ANY_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static LEADING_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:nom|pr[ée]nom)\b\s*[/:\-]?\s*").unwrap());
static PLACEHOLDER_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/: \t]+").unwrap());

/// Remove diacritics: canonical-compatible decomposition, combining marks dropped
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Lowercase, accent-free, single-spaced, trimmed.
///
/// Non-breaking spaces become plain spaces and byte-order marks disappear.
/// Line breaks are kept; see [`fold_group`] for labels spanning lines.
pub fn fold(text: &str) -> String {
    let stripped = strip_accents(text)
        .replace('\u{a0}', " ")
        .replace('\u{feff}', "");
    HORIZONTAL_SPACE
        .replace_all(&stripped, " ")
        .trim()
        .to_lowercase()
}

/// Equality key for a group label
///
/// `"Remplaçant 1\nG1"` and `"REMPLACANT 1 G1"` fold to the same key.
pub fn fold_group(text: &str) -> String {
    let folded = fold(text).replace(['\r', '\n'], " ");
    ANY_SPACE
        .replace_all(&folded, " ")
        .trim()
        .replace("remplaçant", "remplacant")
}

/// Drop leading `Nom` / `Prénom` labels, however many are stacked
///
/// `"Nom/Prénom DUPONT"` becomes `"DUPONT"`. A label glued to a longer word
/// (`"Nomade"`) is left alone.
pub fn strip_leading_label(text: &str) -> String {
    let mut current = text.trim().to_string();
    while let Some(m) = LEADING_LABEL.find(&current) {
        current = current[m.end()..].to_string();
    }
    current.trim().to_string()
}

/// A cell that only holds a `Nom` / `Prénom` placeholder
pub fn is_placeholder(text: &str) -> bool {
    let folded = fold(text);
    let bare = PLACEHOLDER_NOISE.replace_all(&folded, "");
    bare == "nom" || bare == "prenom"
}

/// Label starting a substitute group (`Remplaçant 1 G1`, `REMPLACANT 2`)
pub fn is_substitute_label(text: &str) -> bool {
    fold(text).starts_with(SUBSTITUTE_PREFIX)
}

/// `Act. jour` in the marker column, any case or spacing
pub fn is_activity_marker(text: &str) -> bool {
    fold(text) == ACTIVITY_MARKER
}

/// `Hor.` in the marker column (exact)
pub fn is_hours_marker(text: &str) -> bool {
    text == HOURS_MARKER
}

/// `Nom` in the marker column, any case or spacing
pub fn is_name_marker(text: &str) -> bool {
    fold(text) == "nom"
}
