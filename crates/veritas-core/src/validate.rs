//! Input validation
//!
//! Rejects text that is too short, too long or carries markup that has no
//! business in a passage to fact-check.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ValidationConfig;
use crate::error::ValidationError;

pub const DEFAULT_MIN_CHARS: usize = 10;
pub const DEFAULT_MAX_CHARS: usize = 5000;
pub const DEFAULT_MIN_WORDS: usize = 3;

lazy_static! {
    static ref UNSAFE_PATTERNS: Vec<(&'static str, Regex)> = [
        ("<script", r"(?i)<\s*script"),
        ("javascript:", r"(?i)javascript\s*:"),
        ("inline event handler", r"(?i)\bon[a-z]+\s*="),
        ("<iframe", r"(?i)<\s*iframe"),
        ("<embed", r"(?i)<\s*embed"),
        ("<object", r"(?i)<\s*object"),
        ("eval(", r"(?i)\beval\s*\("),
        ("document.cookie", r"(?i)document\.cookie"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("valid regex")))
    .collect();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator {
    config: ValidationConfig,
}

impl InputValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check `text` and return it trimmed.
    pub fn validate<'a>(&self, text: &'a str) -> Result<&'a str, ValidationError> {
        let trimmed = text.trim();
        let len = trimmed.chars().count();

        if len < self.config.min_chars {
            return Err(ValidationError::TooShort {
                len,
                min: self.config.min_chars,
            });
        }
        if len > self.config.max_chars {
            return Err(ValidationError::TooLong {
                len,
                max: self.config.max_chars,
            });
        }

        let words = trimmed.split_whitespace().count();
        if words < self.config.min_words {
            return Err(ValidationError::TooFewWords {
                words,
                min: self.config.min_words,
            });
        }

        if let Some((name, _)) = UNSAFE_PATTERNS.iter().find(|(_, re)| re.is_match(trimmed)) {
            return Err(ValidationError::UnsafeContent(name.to_string()));
        }

        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(text: &str) -> Result<&str, ValidationError> {
        InputValidator::default().validate(text)
    }

    #[test]
    fn accepts_ordinary_prose() {
        assert_eq!(
            validate("  Albert Einstein was born in 1879.  ").unwrap(),
            "Albert Einstein was born in 1879."
        );
    }

    #[test]
    fn length_is_measured_after_trimming() {
        assert_eq!(
            validate("   a b c    "),
            Err(ValidationError::TooShort { len: 5, min: 10 })
        );
    }

    #[test]
    fn rejects_too_long() {
        let text = "word ".repeat(1001);
        assert!(matches!(validate(&text), Err(ValidationError::TooLong { max: 5000, .. })));
    }

    #[test]
    fn rejects_too_few_words() {
        assert_eq!(
            validate("Supercalifragilistic expialidocious"),
            Err(ValidationError::TooFewWords { words: 2, min: 3 })
        );
    }

    #[test]
    fn rejects_script_content() {
        for text in [
            "Hello there <SCRIPT>alert(1)</script> friend",
            "Click this javascript:void(0) link now",
            "An image <img src=x onerror=alert(1)> here",
            "Please run eval (payload) for me",
            "Steal the document.cookie value now",
            "Embedded frame <iframe src=x></iframe> here",
        ] {
            assert!(
                matches!(validate(text), Err(ValidationError::UnsafeContent(_))),
                "accepted: {}",
                text
            );
        }
    }

    #[test]
    fn words_starting_with_on_are_fine() {
        assert!(validate("Only one online shop opened on Monday.").is_ok());
    }

    #[test]
    fn custom_bounds() {
        let validator = InputValidator::new(ValidationConfig {
            min_chars: 1,
            max_chars: 20,
            min_words: 1,
        });
        assert!(validator.validate("Hi").is_ok());
        assert!(validator.validate("this sentence is longer than twenty").is_err());
    }
}
