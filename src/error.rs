//! Error types for SEG-Y decoding.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegyError {
    #[error("unsupported sample format code: {0}")]
    UnsupportedFormat(i16),

    #[error("file header too short: expected at least {expected} bytes, got {actual}")]
    HeaderTooShort { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SegyError>;
