//! Logging setup with Veritas segment prefixes.
//!
//! Provides consistent logging setup across Veritas binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with Veritas defaults.
///
/// Sets up tracing-subscriber with:
/// - Environment filter (RUST_LOG)
/// - Compact format suitable for terminal output
pub fn init() {
    init_with_filter("info");
}

/// Initialize tracing with a custom default filter.
///
/// `RUST_LOG` still wins when set. Safe to call more than once; later calls
/// are ignored.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Fails only when a global subscriber is already set; that one stays.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
        .ok();
}

/// Veritas segment prefixes for logging.
pub mod prefix {
    /// Model and data loading
    pub const LOAD: &str = "✿";
    /// Verdict produced
    pub const VERDICT: &str = "⊢";
    /// Readiness report
    pub const HEALTH: &str = "♥";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_keeps_first_subscriber() {
        init_with_filter("debug");
        init();
        ::tracing::info!("{} still logging after second init", prefix::HEALTH);
    }
}
