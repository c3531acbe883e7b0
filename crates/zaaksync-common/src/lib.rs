//! Zaaksync Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error taxonomy and logging setup for the zaaksync workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all zaaksync workspace members:
//!
//! - **Error Handling**: the bridge-wide error taxonomy and result alias
//! - **Logging**: tracing-based logging configuration and initialization
//!
//! # Example
//!
//! ```no_run
//! use zaaksync_common::{BridgeError, Result};
//!
//! fn lookup(reference: &str) -> Result<String> {
//!     Err(BridgeError::UnresolvedReference(reference.to_string()))
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{BridgeError, Result};
