//! Error types for the analysis controller.
//!
//! [`DispatchError`] is the user-visible taxonomy of one request cycle. Its
//! `Display` output is exactly the text shown in the error panel.
//! [`BackendError`] describes why the HTTP exchange itself failed, and
//! [`CheckerError`] covers everything outside a request cycle (config files,
//! client construction, output).

use std::path::PathBuf;

use thiserror::Error;

/// Shown when the trimmed input is empty.
pub const VALIDATION_MESSAGE: &str = "Please enter some text to analyze.";

/// Shown for a non-2xx reply that carries no `error` field.
pub const SERVER_FALLBACK_MESSAGE: &str = "An error occurred while analyzing the text.";

/// Shown whenever no usable response could be obtained.
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Terminal failure outcome of a single dispatch cycle.
///
/// The three variants are mutually exclusive and all of them end up in the
/// same error panel via [`View::show_error`](crate::view::View::show_error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Input was empty after trimming. No request was sent.
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,
    /// The backend answered, but reported a failure.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// No response could be obtained (connect failure, timeout, unreadable body).
    #[error("{}", NETWORK_MESSAGE)]
    Transport,
}

/// Failure of the HTTP exchange with the analysis backend.
///
/// Each variant carries enough context to diagnose the failure in logs; none
/// of it is shown to the user.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A TCP-level connection could not be established or was lost.
    #[error("connection to {url} failed: {detail}")]
    Connect { url: String, detail: String },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// The remote server replied with a non-2xx HTTP status code.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },
    /// Response body could not be read or decoded.
    #[error("unreadable response body from {url}: {detail}")]
    Body { url: String, detail: String },
}

impl BackendError {
    /// Classify a `reqwest` failure for `url`.
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            BackendError::Body {
                url: url.to_string(),
                detail: err.to_string(),
            }
        } else {
            BackendError::Connect {
                url: url.to_string(),
                detail: err.to_string(),
            }
        }
    }
}

/// Crate-level error for everything outside a dispatch cycle.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    ConfigValue(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("backend health check failed: {0}")]
    Health(#[from] BackendError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
