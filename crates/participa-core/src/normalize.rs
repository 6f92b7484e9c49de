//! Text normalisation for Portuguese free text.
//!
//! Citizens type (or dictate) with inconsistent casing, accents and
//! punctuation: "Médico", "medico", "MÉDICO!" must all compare equal.
//!
//! # Forms
//!
//! - [`fold_diacritics`]: lower-case and strip combining marks. Punctuation and
//!   spacing survive. Used for catalog search.
//! - [`normalize_text`]: `fold_diacritics`, then every character outside
//!   `[a-z0-9]` becomes a space and whitespace runs collapse to one space.
//!   Used for keyword classification.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block (U+0300..U+036F).
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Lower-case and remove accents, leaving every other character in place.
///
/// "Saúde Pública" → "saude publica", "Ação!" → "acao!"
pub fn fold_diacritics(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Normalise text for keyword comparison.
///
/// Input: arbitrary text like "  O MÉDICO, não veio!! "
/// Output: "o medico nao veio"
///
/// # Algorithm
///
/// 1. Lower-case, NFD-decompose, drop combining marks
/// 2. Replace any character that is not an ASCII lowercase letter, ASCII digit
///    or whitespace with a space
/// 3. Collapse whitespace runs to a single space and trim
pub fn normalize_text(s: &str) -> String {
    let folded: String = fold_diacritics(s)
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
