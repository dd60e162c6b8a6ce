//! Unified error types for newsroom.
//!
//! The code prefixes are stable so callers can log or match on them without
//! depending on pipeline internals.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the ingestion pipeline and its store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty feed URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Missing or invalid source/keyword definition. Never retried.
    #[error("CONFIG_ERROR: {0}")]
    Configuration(String),

    /// No source with the given id is configured.
    #[error("SOURCE_NOT_FOUND: {0}")]
    UnknownSource(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Single-attempt fetch timed out.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-success status or transport error on a single attempt.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Every attempt of a retrying fetch failed.
    #[error("FETCH_FAILED: source={source_id} stage={stage} url={url} attempts={attempts}: {reason}")]
    Fetch { source_id: String, stage: String, url: String, attempts: u32, reason: String },

    /// Syndication feed could not be parsed.
    #[error("FEED_PARSE_FAILED: {0}")]
    FeedParse(String),
}

impl Error {
    /// True for errors raised before any network activity because a definition is unusable.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::UnknownSource(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::Configuration(_) => -32013,
            Error::UnknownSource(_) => -32014,
            Error::Database(_) | Error::MigrationFailed(_) => -32002,
            Error::InvalidUrl(_) => -32003,
            Error::FetchTimeout(_) => -32006,
            Error::FetchTooLarge(_) => -32007,
            Error::HttpError(_) => -32008,
            Error::Fetch { .. } => -32015,
            Error::FeedParse(_) => -32016,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
