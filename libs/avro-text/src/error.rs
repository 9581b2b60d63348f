use std::collections::TryReserveError;
use std::path::PathBuf;

use crate::model::LogicalType;

/// Conversion error. Everything except [`Error::Io`] and [`Error::Open`]
/// only aborts the record being converted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("unsupported logical type: {0}")]
    UnsupportedLogicalType(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unsupported(logical: &LogicalType, physical: &str) -> Self {
        Error::UnsupportedLogicalType(format!("{logical} on {physical}"))
    }

    /// Add context to the error.
    ///
    /// For message-carrying variants the context is prepended to the message.
    /// `Io` and `Open` are returned unchanged.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Error::Decode(msg) => Error::Decode(format!("{ctx}: {msg}")),
            Error::UnsupportedLogicalType(msg) => {
                Error::UnsupportedLogicalType(format!("{ctx}: {msg}"))
            }
            Error::OutOfMemory(msg) => Error::OutOfMemory(format!("{ctx}: {msg}")),
            Error::Config(msg) => Error::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }

    /// Whether the error should stop the whole stream instead of one record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Open { .. } | Error::Config(_))
    }
}

impl From<apache_avro::Error> for Error {
    fn from(e: apache_avro::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::OutOfMemory(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Io(e.into())
        } else {
            Error::Decode(e.to_string())
        }
    }
}
