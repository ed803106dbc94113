//! Pipeline configuration
//!
//! Fixed at process start. Every field has a default so a partial TOML
//! document (or none at all) yields a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS};
use crate::claim::{DEFAULT_MAX_CLAIMS, DEFAULT_MIN_CLAIM_LEN};
use crate::entailment::DEFAULT_SEPARATOR;
use crate::evidence::DEFAULT_TOP_K;
use crate::validate::{DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS, DEFAULT_MIN_WORDS};
use crate::verdict::{Thresholds, DEFAULT_FALSEHOOD_THRESHOLD, DEFAULT_TRUTH_THRESHOLD};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for the claim-assessment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// support >= truth_threshold -> Truth
    pub truth_threshold: f64,
    /// support < falsehood_threshold -> Falsehood
    pub falsehood_threshold: f64,
    /// Evidence items retrieved per claim
    pub top_k: usize,
    /// Maximum claims extracted from one passage
    pub max_claims: usize,
    /// Minimum claim length in characters
    pub min_claim_len: usize,
    /// Deadline for one classification request
    pub request_timeout_secs: u64,
    /// Token joining premise and hypothesis for the entailment model
    pub entailment_separator: String,
    pub cache: CacheConfig,
    pub validation: ValidationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            truth_threshold: DEFAULT_TRUTH_THRESHOLD,
            falsehood_threshold: DEFAULT_FALSEHOOD_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            max_claims: DEFAULT_MAX_CLAIMS,
            min_claim_len: DEFAULT_MIN_CLAIM_LEN,
            request_timeout_secs: 30,
            entailment_separator: DEFAULT_SEPARATOR.to_string(),
            cache: CacheConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse from TOML and validate.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()?;
        let positive = [
            ("top_k", self.top_k as u64),
            ("max_claims", self.max_claims as u64),
            ("min_claim_len", self.min_claim_len as u64),
            ("request_timeout_secs", self.request_timeout_secs),
            ("cache.max_entries", self.cache.max_entries as u64),
            ("cache.ttl_secs", self.cache.ttl_secs),
            ("validation.max_chars", self.validation.max_chars as u64),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than 0", name)));
            }
        }
        if self.validation.min_chars > self.validation.max_chars {
            return Err(ConfigError::Invalid(format!(
                "validation.min_chars ({}) exceeds validation.max_chars ({})",
                self.validation.min_chars, self.validation.max_chars
            )));
        }
        if self.entailment_separator.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "entailment_separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.truth_threshold, self.falsehood_threshold)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Result cache bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_CAPACITY,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Input bounds checked before the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_chars: usize,
    pub max_chars: usize,
    pub min_words: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
            min_words: DEFAULT_MIN_WORDS,
        }
    }
}
