//! Veritas - Main Entry Point
//!
//! Classifies passages as truth, falsehood or neutral against a local
//! knowledge base.
//!
//! Usage:
//!     veritas classify --text "Albert Einstein was born in 1879."
//!     veritas classify --file passage.txt --pretty
//!     echo "..." | veritas classify
//!     veritas health --config veritas.toml

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use veritas::tracing::prefix;
use veritas::{Error, Result};
use veritas_core::{CacheStats, FactChecker, Readiness, ResultCache};
use veritas_inference::{load_context, Settings};

#[derive(Parser, Debug)]
#[command(name = "veritas")]
#[command(about = "Evidence-backed fact checking for short passages")]
#[command(version)]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the settings file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify passages and print each verdict as JSON
    Classify {
        /// Passage to classify; repeat to classify several in order
        #[arg(short, long)]
        text: Vec<String>,

        /// Read the passage from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Load models and data, then report readiness
    Health,
}

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    #[serde(flatten)]
    readiness: Readiness,
    cache: CacheStats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| settings.log_level.clone());
    veritas::tracing::init_with_filter(&log_level);

    info!("Starting Veritas v{}", env!("CARGO_PKG_VERSION"));

    let context = load_context(&settings);
    let cache = Arc::new(ResultCache::new(settings.pipeline.cache));
    let checker = FactChecker::new(context, cache, settings.pipeline.clone())?;

    match args.command {
        Command::Classify { text, file, pretty } => {
            for passage in read_inputs(text, file)? {
                let verdict = checker.classify(&passage).await?;
                info!(
                    "{} {} (confidence {:.3})",
                    prefix::VERDICT,
                    verdict.classification,
                    verdict.confidence
                );
                print_json(&verdict, pretty)?;
            }
        }
        Command::Health => {
            let readiness = checker.context().readiness();
            info!(
                "{} ready={} missing={:?}",
                prefix::HEALTH,
                readiness.ready,
                readiness.missing
            );
            let report = HealthReport {
                status: if readiness.ready { "healthy" } else { "not_ready" },
                readiness,
                cache: checker.cache().stats(),
            };
            print_json(&report, true)?;
        }
    }

    Ok(())
}

/// Passages from `--text`, `--file` or stdin, in that order of preference.
fn read_inputs(text: Vec<String>, file: Option<PathBuf>) -> Result<Vec<String>> {
    if !text.is_empty() {
        return Ok(text);
    }
    if let Some(path) = file {
        return Ok(vec![std::fs::read_to_string(path)?]);
    }

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Err(Error::Config(
            "no input: pass --text, --file or pipe text on stdin".to_string(),
        ));
    }
    Ok(vec![input])
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
