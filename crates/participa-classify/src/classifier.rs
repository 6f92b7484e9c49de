//! Keyword classification for manifestations.
//!
//! Normalises the text, counts which keywords of each rule occur in it,
//! multiplies by the rule priority and keeps the best-scoring rule. Text that
//! matches nothing falls back to the catch-all subject.

use std::fmt;
use std::sync::LazyLock;

use participa_core::normalize_text;
use participa_core::subjects::{Subject, fallback_subject};
use participa_core::SubjectSelection;
use serde::Serialize;
use tracing::debug;

use crate::rules::{KEYWORD_RULES, KeywordRule};

/// How sure the classifier is, from the winning rule's match count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Three or more keywords matched.
    Alta,
    /// Exactly two.
    Media,
    /// One, or the fallback.
    Baixa,
}

impl Confidence {
    pub fn from_matches(count: usize) -> Self {
        match count {
            0 | 1 => Self::Baixa,
            2 => Self::Media,
            _ => Self::Alta,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baixa => "baixa",
        }
    }

    /// Label shown next to a suggestion.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Alta => "Sugestão com alta confiança",
            Self::Media => "Sugestão com média confiança",
            Self::Baixa => "Sugestão automática",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested subject and agency for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub subject_id: String,
    pub subject_label: String,
    pub suggested_agency: String,
    pub confidence: Confidence,
    /// Keywords of the winning rule found in the text, as written in the rule.
    pub matched_keywords: Vec<String>,
}

impl ClassificationResult {
    fn fallback(subject: &Subject) -> Self {
        Self {
            subject_id: subject.id.to_string(),
            subject_label: subject.label.to_string(),
            suggested_agency: subject.suggested_agency.to_string(),
            confidence: Confidence::Baixa,
            matched_keywords: Vec::new(),
        }
    }

    /// Subject selection the form can adopt directly.
    pub fn selection(&self) -> SubjectSelection {
        SubjectSelection {
            subject_id: self.subject_id.clone(),
            subject_label: self.subject_label.clone(),
            suggested_agency: self.suggested_agency.clone(),
        }
    }
}

/// A keyword pre-normalised at construction time.
struct CompiledKeyword {
    original: &'static str,
    normalized: String,
    /// Multi-word keywords match as phrases, single words as whole tokens.
    phrase: bool,
}

struct CompiledRule {
    rule: KeywordRule,
    keywords: Vec<CompiledKeyword>,
}

/// Keyword classifier over a fixed rule table.
///
/// Holds the rules with their keywords already normalised. Classification is
/// a pure function of the text: no state changes between calls.
pub struct KeywordClassifier {
    rules: Vec<CompiledRule>,
    fallback: &'static Subject,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(KEYWORD_RULES, fallback_subject())
    }
}

impl KeywordClassifier {
    /// Build a classifier from `rules` (table order breaks ties) and the
    /// subject returned when nothing matches.
    pub fn new(rules: &[KeywordRule], fallback: &'static Subject) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let keywords: &'static [&'static str] = rule.keywords;
                CompiledRule {
                    rule: *rule,
                    keywords: keywords
                        .iter()
                        .map(|&original| {
                            let normalized = normalize_text(original);
                            let phrase = normalized.contains(' ');
                            CompiledKeyword {
                                original,
                                normalized,
                                phrase,
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        Self { rules, fallback }
    }

    /// Classify free text. Never fails; unmatched or blank text yields the
    /// fallback subject with [`Confidence::Baixa`].
    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            return ClassificationResult::fallback(self.fallback);
        }

        let normalized = normalize_text(text);
        let words: Vec<&str> = normalized.split(' ').collect();

        // Highest score wins; on a tie the earlier rule keeps the lead.
        let mut best: Option<(&CompiledRule, Vec<&'static str>, u64)> = None;

        for compiled in &self.rules {
            let matches: Vec<&'static str> = compiled
                .keywords
                .iter()
                .filter(|k| {
                    if k.normalized.is_empty() {
                        false
                    } else if k.phrase {
                        normalized.contains(&k.normalized)
                    } else {
                        words.contains(&k.normalized.as_str())
                    }
                })
                .map(|k| k.original)
                .collect();

            if matches.is_empty() {
                continue;
            }

            let score = matches.len() as u64 * u64::from(compiled.rule.priority);
            if best.as_ref().is_none_or(|(_, _, top)| score > *top) {
                best = Some((compiled, matches, score));
            }
        }

        let Some((winner, matches, score)) = best else {
            debug!("no keyword matched, using fallback subject");
            return ClassificationResult::fallback(self.fallback);
        };

        debug!(
            subject = winner.rule.subject_id,
            score,
            matches = matches.len(),
            "classified manifestation"
        );

        ClassificationResult {
            subject_id: winner.rule.subject_id.to_string(),
            subject_label: winner.rule.subject_label.to_string(),
            suggested_agency: winner.rule.suggested_agency.to_string(),
            confidence: Confidence::from_matches(matches.len()),
            matched_keywords: matches.into_iter().map(String::from).collect(),
        }
    }

    /// Number of rules in the table.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

static BUILTIN: LazyLock<KeywordClassifier> = LazyLock::new(KeywordClassifier::default);

/// Classify with the built-in rule table, compiled once per process.
pub fn classify(text: &str) -> ClassificationResult {
    BUILTIN.classify(text)
}
