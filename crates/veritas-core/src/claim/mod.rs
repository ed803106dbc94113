//! Claim extraction
//!
//! Splits a passage into sentences and keeps the ones that look like factual
//! assertions: sentences carrying a linking/reporting verb or a number.

mod extractor;

pub use extractor::{split_sentences, ClaimExtractor, DEFAULT_MAX_CLAIMS, DEFAULT_MIN_CLAIM_LEN};

use serde::{Deserialize, Serialize};

/// A factual assertion extracted from input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Trimmed sentence text
    pub text: String,
    /// Index of the sentence in the original passage
    pub position: usize,
}

impl Claim {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
