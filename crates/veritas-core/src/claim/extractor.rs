//! Heuristic sentence filter

use lazy_static::lazy_static;
use regex::Regex;

use super::Claim;

pub const DEFAULT_MAX_CLAIMS: usize = 8;
pub const DEFAULT_MIN_CLAIM_LEN: usize = 30;

lazy_static! {
    /// Sentence-ending punctuation followed by whitespace
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]\s+").expect("valid regex");

    /// Linking and reporting verbs that usually introduce a checkable fact
    static ref FACTUAL_VERB: Regex = Regex::new(
        r"(?i)\b(is|was|are|were|won|died|born|founded|established|announced|reported|has|have|had)\b"
    )
    .expect("valid regex");

    static ref DIGIT: Regex = Regex::new(r"\d").expect("valid regex");
}

/// Split text on `.`, `!` or `?` followed by whitespace.
///
/// The punctuation stays with its sentence; the whitespace is dropped.
/// Returned sentences are trimmed and never empty.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BOUNDARY.find_iter(text) {
        // punctuation is a single ASCII byte
        sentences.push(text[start..m.start() + 1].trim());
        start = m.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Extracts candidate factual claims from a passage.
#[derive(Debug, Clone, Copy)]
pub struct ClaimExtractor {
    max_claims: usize,
    min_len: usize,
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CLAIMS, DEFAULT_MIN_CLAIM_LEN)
    }
}

impl ClaimExtractor {
    pub fn new(max_claims: usize, min_len: usize) -> Self {
        Self {
            max_claims,
            min_len,
        }
    }

    pub fn max_claims(&self) -> usize {
        self.max_claims
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Extract up to `max_claims` claims.
    ///
    /// Sentences of at least `min_len` characters that carry a factual
    /// indicator are returned in text order. When none qualify, the longest
    /// sentences meeting the length bound are returned instead, longest
    /// first. Each claim keeps its sentence position either way.
    pub fn extract(&self, text: &str) -> Vec<Claim> {
        let long_enough: Vec<(usize, &str)> = split_sentences(text)
            .into_iter()
            .enumerate()
            .filter(|(_, s)| s.chars().count() >= self.min_len)
            .collect();

        let mut candidates: Vec<(usize, &str)> = long_enough
            .iter()
            .copied()
            .filter(|(_, s)| has_factual_indicator(s))
            .collect();

        if candidates.is_empty() {
            candidates = long_enough;
            // stable: equal lengths keep text order
            candidates.sort_by(|(_, a), (_, b)| b.chars().count().cmp(&a.chars().count()));
        }

        candidates
            .into_iter()
            .take(self.max_claims)
            .map(|(position, s)| Claim::new(s, position))
            .collect()
    }
}

/// A lexicon verb as a whole word, or any digit.
fn has_factual_indicator(sentence: &str) -> bool {
    FACTUAL_VERB.is_match(sentence) || DIGIT.is_match(sentence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(claims: &[Claim]) -> Vec<&str> {
        claims.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn keeps_factual_sentence_drops_short_opinion() {
        let extractor = ClaimExtractor::default();
        let claims = extractor.extract(
            "Albert Einstein was born on March 14, 1879, in Ulm, Germany. The theory is beautiful.",
        );
        assert_eq!(
            texts(&claims),
            vec!["Albert Einstein was born on March 14, 1879, in Ulm, Germany."]
        );
        assert_eq!(claims[0].position, 0);
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        let extractor = ClaimExtractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n\t   ").is_empty());
    }

    #[test]
    fn preserves_text_order() {
        let extractor = ClaimExtractor::default();
        let claims = extractor.extract(
            "First sentence with year 2020. Second sentence with year 2021. Third sentence with year 2022.",
        );
        assert_eq!(claims.len(), 3);
        assert!(claims[0].text.contains("2020"));
        assert!(claims[1].text.contains("2021"));
        assert!(claims[2].text.contains("2022"));
        assert_eq!(
            claims.iter().map(|c| c.position).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn truncates_to_max_claims() {
        let text = (1..20)
            .map(|i| format!("Statement number {} is factual and contains information.", i))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(ClaimExtractor::default().extract(&text).len(), 8);
        assert_eq!(ClaimExtractor::new(3, 30).extract(&text).len(), 3);
    }

    #[test]
    fn verb_match_is_case_insensitive() {
        let extractor = ClaimExtractor::new(8, 10);
        let claims = extractor.extract("Paris IS the capital of France");
        assert_eq!(texts(&claims), vec!["Paris IS the capital of France"]);
    }

    #[test]
    fn substring_verbs_do_not_count() {
        // Two sentences, neither with a lexicon word nor a digit. The fallback
        // returns them longest first, which proves the filter rejected both.
        let extractor = ClaimExtractor::new(8, 20);
        let claims = extractor.extract(
            "This island holds wonderful views. Historians thinking about hashes enjoy long walks.",
        );
        assert_eq!(
            texts(&claims),
            vec![
                "Historians thinking about hashes enjoy long walks.",
                "This island holds wonderful views."
            ]
        );
    }

    #[test]
    fn fallback_orders_by_length_descending() {
        let extractor = ClaimExtractor::new(8, 50);
        let claims = extractor.extract(
            "The beautiful sunset over the ocean creates wonderful memories and feelings of peace and tranquility. \
             Short one. \
             Another long descriptive sentence about the wonderful nature and amazing landscapes around the whole world.",
        );
        assert_eq!(claims.len(), 2);
        assert!(claims[0].text.starts_with("Another long"));
        assert_eq!(claims[0].position, 2);
        assert_eq!(claims[1].position, 0);
    }

    #[test]
    fn min_len_counts_characters() {
        let extractor = ClaimExtractor::new(8, 60);
        let claims = extractor.extract(
            "Short text here with a number 5. This is a much longer sentence that contains more information and details.",
        );
        assert_eq!(claims.len(), 1);
        assert!(claims[0].text.chars().count() >= 60);
    }

    #[test]
    fn trailing_whitespace_leaves_no_empty_claim() {
        let claims = ClaimExtractor::new(8, 0).extract("Lovely views here. ");
        assert_eq!(texts(&claims), vec!["Lovely views here."]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn decimal_points_do_not_split() {
        let sentences = split_sentences("Python 3.10 was released in 2021. It is fast!  Really?");
        assert_eq!(
            sentences,
            vec!["Python 3.10 was released in 2021.", "It is fast!", "Really?"]
        );
    }
}
