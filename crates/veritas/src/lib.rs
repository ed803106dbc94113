//! # Veritas Shared Rust Library
//!
//! Shared infrastructure for the Veritas binaries:
//! - **error**: Common error type wrapping the engine's errors
//! - **tracing**: Logging setup and segment prefixes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veritas::error::{Error, Result};
//!
//! fn main() -> Result<()> {
//!     veritas::tracing::init();
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod tracing;

pub use error::{Error, Result};
