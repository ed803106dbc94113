//! Process settings
//!
//! One TOML file covers the pipeline, both models and the knowledge-base
//! data. Every section is optional, and a section that names only some keys
//! keeps the defaults for the rest.
//!
//! ```toml
//! log_level = "debug"
//!
//! [pipeline]
//! truth_threshold = 0.85
//! top_k = 6
//!
//! [embedder]
//! model_path = "models/all-MiniLM-L6-v2/model.onnx"
//! tokenizer_path = "models/all-MiniLM-L6-v2/tokenizer.json"
//!
//! [entailment]
//! model_path = "models/roberta-large-mnli/model.onnx"
//! tokenizer_path = "models/roberta-large-mnli/tokenizer.json"
//! labels = ["CONTRADICTION", "NEUTRAL", "ENTAILMENT"]
//!
//! [data]
//! knowledge_base = "data/kb_snippets.json"
//! index = "data/index/wikipedia.fvecs"
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;
use veritas::{Error, Result};
use veritas_core::PipelineConfig;

use crate::engine::EngineConfig;
use crate::nli::NliConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings")]
pub struct Settings {
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    pub pipeline: PipelineConfig,
    pub embedder: EngineConfig,
    pub entailment: NliConfig,
    pub data: DataPaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pipeline: PipelineConfig::default(),
            embedder: EngineConfig {
                model_path: "models/all-MiniLM-L6-v2/model.onnx".to_string(),
                tokenizer_path: "models/all-MiniLM-L6-v2/tokenizer.json".to_string(),
                max_length: 256,
                ..EngineConfig::default()
            },
            entailment: NliConfig {
                engine: EngineConfig {
                    model_path: "models/roberta-large-mnli/model.onnx".to_string(),
                    tokenizer_path: "models/roberta-large-mnli/tokenizer.json".to_string(),
                    normalize: false,
                    ..EngineConfig::default()
                },
                ..NliConfig::default()
            },
            data: DataPaths::default(),
        }
    }
}

/// Settings as written. Model sections stay raw so they can be laid over
/// the per-model defaults instead of the bare engine defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    log_level: Option<String>,
    pipeline: PipelineConfig,
    embedder: Option<toml::Table>,
    entailment: Option<toml::Table>,
    data: DataPaths,
}

impl TryFrom<RawSettings> for Settings {
    type Error = Error;

    fn try_from(raw: RawSettings) -> Result<Self> {
        let defaults = Settings::default();
        Ok(Self {
            log_level: raw.log_level.unwrap_or(defaults.log_level),
            pipeline: raw.pipeline,
            embedder: overlay(defaults.embedder, raw.embedder)?,
            entailment: overlay(defaults.entailment, raw.entailment)?,
            data: raw.data,
        })
    }
}

/// Replace the keys of `base` named in `section`.
fn overlay<T>(base: T, section: Option<toml::Table>) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let Some(section) = section else {
        return Ok(base);
    };
    let mut table = match toml::Value::try_from(base) {
        Ok(toml::Value::Table(table)) => table,
        Ok(other) => {
            return Err(Error::Config(format!(
                "expected a table of settings, found {}",
                other.type_str()
            )))
        }
        Err(e) => return Err(Error::Config(e.to_string())),
    };
    table.extend(section);
    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| Error::Config(e.to_string()))
}

/// Knowledge-base snippets and their vectors, row-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub knowledge_base: String,
    pub index: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            knowledge_base: "data/kb_snippets.json".to_string(),
            index: "data/index/wikipedia.fvecs".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(toml_str).map_err(|e| Error::Config(e.to_string()))?;
        settings.pipeline.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                info!("Reading settings from {}", path.display());
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml(&contents)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn sections_override_independently() {
        let settings = Settings::from_toml(
            r#"
            log_level = "debug"

            [pipeline]
            top_k = 3

            [pipeline.cache]
            ttl_secs = 60

            [entailment]
            model_path = "/opt/nli.onnx"
            labels = ["entailment", "neutral", "contradiction"]

            [data]
            index = "/srv/kb.fvecs"
            "#,
        )
        .unwrap();

        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.pipeline.top_k, 3);
        assert_eq!(settings.pipeline.cache.ttl_secs, 60);
        assert_eq!(settings.pipeline.cache.max_entries, 100);
        assert_eq!(settings.entailment.engine.model_path, "/opt/nli.onnx");
        assert_eq!(
            settings.entailment.engine.tokenizer_path,
            "models/roberta-large-mnli/tokenizer.json"
        );
        assert_eq!(settings.entailment.labels[0], "entailment");
        assert_eq!(settings.data.index, "/srv/kb.fvecs");
        assert_eq!(settings.data.knowledge_base, "data/kb_snippets.json");
        assert_eq!(settings.embedder, Settings::default().embedder);
    }

    #[test]
    fn partial_model_sections_keep_model_defaults() {
        let settings = Settings::from_toml(
            r#"
            [embedder]
            model_path = "/opt/emb.onnx"

            [entailment]
            model_path = "/opt/nli.onnx"
            "#,
        )
        .unwrap();
        let defaults = Settings::default();

        assert_eq!(settings.embedder.model_path, "/opt/emb.onnx");
        assert_eq!(settings.embedder.tokenizer_path, "models/all-MiniLM-L6-v2/tokenizer.json");
        assert_eq!(settings.embedder.max_length, 256);
        assert!(settings.embedder.normalize);

        assert_eq!(settings.entailment.engine.model_path, "/opt/nli.onnx");
        assert_eq!(
            settings.entailment.engine.tokenizer_path,
            "models/roberta-large-mnli/tokenizer.json"
        );
        assert!(!settings.entailment.engine.normalize);
        assert_eq!(settings.entailment.labels, defaults.entailment.labels);
    }

    #[test]
    fn mistyped_model_key_is_config_error() {
        let err = Settings::from_toml("[embedder]\nmax_length = \"long\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn invalid_pipeline_is_config_error() {
        let err = Settings::from_toml("[pipeline]\nfalsehood_threshold = 0.95").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\nmax_claims = 4").unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.pipeline.max_claims, 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/veritas.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
