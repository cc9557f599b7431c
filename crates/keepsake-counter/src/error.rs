use std::io;

/// Failures while reading or writing a counter file.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The file exists but does not hold an integer.
    #[error("counter file does not hold an integer: {content:?}")]
    Parse { content: String },

    /// `write` was asked to persist nothing.
    #[error("counter cannot be written as empty")]
    Empty,
}

pub type CounterResult<T> = Result<T, CounterError>;
