//! Unified error type for reelcast.
//!
//! Every failure in the request path funnels into [`Error`], which carries
//! enough context for the HTTP layer to derive a status code via
//! [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in reelcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "video").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The `Range` header could not be parsed.
    #[error("Malformed range: {0}")]
    MalformedRange(String),

    /// The requested range starts at or beyond the end of the asset.
    #[error("Range not satisfiable: start {start} is beyond size {size}")]
    RangeNotSatisfiable {
        /// Requested first byte.
        start: u64,
        /// Total size of the asset in bytes.
        size: u64,
    },

    /// Transferring bytes failed after the response headers were committed.
    #[error("Stream IO error: {source}")]
    StreamIo {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::MalformedRange(_) => 400,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::StreamIo { .. } => 500,
            Error::Validation(_) => 400,
            Error::Config(_) => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::MalformedRange(_) => "malformed_range",
            Error::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            Error::StreamIo { .. } => "stream_io_error",
            Error::Validation(_) => "validation_error",
            Error::Config(_) => "config_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::MalformedRange`].
    pub fn malformed_range(message: impl Into<String>) -> Self {
        Error::MalformedRange(message.into())
    }

    /// Convenience constructor for [`Error::StreamIo`].
    pub fn stream_io(source: std::io::Error) -> Self {
        Error::StreamIo { source }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
