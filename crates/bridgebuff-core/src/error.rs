use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("Empty response: no bytes received before the idle timeout")]
    EmptyResponse,

    #[error("Exchange failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        last_error: Box<Error>,
    },

    #[error("Connection lost: an earlier exchange failed with an I/O error")]
    ConnectionLost,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while splitting a raw response buffer.
///
/// Every variant is recoverable: the transport discards the buffer and
/// repeats the exchange.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    #[error("missing blank line between headers and body")]
    MissingDelimiter,

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("invalid content-length value: {0:?}")]
    InvalidContentLength(String),

    #[error("body length mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
