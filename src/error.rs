//! Error types for the push-up tracker library.
//!
//! The rep state machine itself never fails: missing landmarks and bad
//! posture are ordinary control flow. These errors cover the surfaces
//! around it (configuration files, recorded landmark streams, filter
//! selection).

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A recorded landmark frame could not be decoded
    #[error("Invalid landmark frame on line {line}: {source}")]
    Json {
        /// 1-based line number in the recording
        line: usize,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
