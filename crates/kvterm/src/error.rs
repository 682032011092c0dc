//! Error types for record construction and configuration.
//!
//! Rendering itself never fails. Errors only arise when a record is built from
//! an untyped key/value list, when configuration cannot be parsed, or when the
//! underlying stream rejects a write.

use std::io;

/// Errors produced by `kvterm`.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// A flat key/value list did not contain an even number of elements.
    #[error("key/value list has odd length {len}")]
    OddKeyValues { len: usize },

    /// A key position held something other than a string.
    #[error("key at position {index} is not a string: {found}")]
    NonStringKey { index: usize, found: String },

    /// Writer configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_yaml::Error> for KvError {
    fn from(err: serde_yaml::Error) -> Self {
        KvError::Config(err.to_string())
    }
}
