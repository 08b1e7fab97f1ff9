//! Error types for the lumen engine.

use std::io;

/// Recoverable errors produced by the engine library.
///
/// GPU and window setup failures are reported through `anyhow` by the device and
/// runtime layers; this enum covers the library surface that callers are expected
/// to match on.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("csv error: {reason} at line {line}")]
    Csv { line: u64, reason: String },

    #[error("csv error: no data in {0}")]
    CsvEmpty(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, EngineError>;
