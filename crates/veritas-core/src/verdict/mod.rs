//! Verdicts & aggregation
//!
//! Per-claim support is mapped onto three classes with two thresholds:
//!
//! ```text
//! 0.0 ── Falsehood ── T_false ── Neutral ── T_truth ── Truth ── 1.0
//! ```
//!
//! The lower threshold is exclusive for Falsehood (support == T_false is
//! Neutral) and the upper one inclusive for Truth.
//!
//! Claims are then combined pessimistically: any Falsehood makes the passage
//! false, otherwise any Neutral makes it neutral.
//!
//! # Example
//!
//! ```rust
//! use veritas_core::verdict::{Classification, Thresholds, VerdictAggregator};
//!
//! let aggregator = VerdictAggregator::new(Thresholds::default());
//! assert_eq!(aggregator.classify_support(0.85).0, Classification::Truth);
//! assert_eq!(aggregator.classify_support(0.40).0, Classification::Neutral);
//! ```

mod aggregator;
mod types;

pub use aggregator::{Thresholds, VerdictAggregator, DEFAULT_FALSEHOOD_THRESHOLD, DEFAULT_TRUTH_THRESHOLD};
pub use types::{ClaimVerdict, Classification, OverallVerdict};
