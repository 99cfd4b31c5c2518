//! Error types for the tailer library.

use thiserror::Error;

/// The main error type for tailer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors when opening, stating or reading the followed file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The followed path does not exist or is not a regular file.
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// UTF-8 decoding errors when reading file content.
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A byte that the configured encoding cannot represent.
    #[error("Invalid {encoding} byte at position {position}")]
    Decode {
        encoding: &'static str,
        position: usize,
    },

    /// The encoding label is not one the tailer knows how to decode.
    #[error("Unsupported encoding: {label}")]
    UnsupportedEncoding { label: String },

    /// The interrupt signal fired while waiting for new data.
    #[error("Interrupted while waiting for new data")]
    Interrupted,

    /// The follower has been closed and cannot be restarted.
    #[error("Stream closed")]
    StreamClosed,
}

/// A convenient Result type for tailer operations.
pub type Result<T> = std::result::Result<T, Error>;
