//! Error types for the board sync core.
//!
//! # Design
//! Two strategies live side by side and must not blur into each other:
//!
//! - `Severity::Fatal`: `ApiError` and `ConfigError`. Anything the remote
//!   service or the config file gets wrong aborts the current pass and
//!   surfaces at the binary's top level.
//! - `Severity::Recoverable`: `DirectiveError`. A malformed or unresolvable
//!   mapping directive only disables the list that carries it; the pass goes
//!   on with the remaining lists.

use std::path::PathBuf;

use thiserror::Error;

/// How an error is handled by the sync drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Logged and skipped; the pass continues.
    Recoverable,
    /// Aborts the pass.
    Fatal,
}

/// Errors returned by `BoardClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401; key or token were rejected.
    #[error("unauthorized: check the configured key and token")]
    Unauthorized,

    /// The server returned 404 for the requested member, board, list or card.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-200 status other than 401 or 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request never produced a response (DNS, connect, TLS, read).
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

/// Reasons a list name's mapping directive yields no mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("malformed directive `{fragment}`: {message}")]
    Malformed { fragment: String, message: String },

    #[error("no list named `{0}` on this board")]
    TargetNotFound(String),

    #[error("{count} lists named `{name}` on this board")]
    AmbiguousTarget { name: String, count: usize },

    #[error("interval of {0} days is out of range")]
    IntervalOutOfRange(u32),
}

impl DirectiveError {
    pub fn severity(&self) -> Severity {
        Severity::Recoverable
    }
}

/// Failures loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_errors_are_recoverable() {
        let err = DirectiveError::TargetNotFound("Weekly".to_string());
        assert_eq!(err.severity(), Severity::Recoverable);
    }

    #[test]
    fn api_errors_are_fatal() {
        assert_eq!(ApiError::NotFound.severity(), Severity::Fatal);
        let err = ApiError::Http {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.severity(), Severity::Fatal);
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }
}
