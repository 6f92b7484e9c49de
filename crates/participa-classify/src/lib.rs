//! Subject classification: scores free text against a keyword rule table and
//! suggests the agency responsible for it.

pub mod classifier;
pub mod rules;

pub use classifier::{ClassificationResult, Confidence, KeywordClassifier, classify};
pub use rules::{KEYWORD_RULES, KeywordRule};
