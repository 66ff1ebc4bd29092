//! Common error types for heltec-bind.
//!
//! Registration is the only operation in the crate that fails upward.
//! Dependency loading and the per-device callbacks report their outcomes
//! through the log instead, so the enum stays small.

use thiserror::Error;

/// Main error type for heltec-bind operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors from tokio or std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host framework refused or could not accept our registration,
    /// e.g. a conflicting claim on the same signature table.
    #[error("registration failed: {0}")]
    Registration(String),
}

/// Convenience type alias for Results using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
