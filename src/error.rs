//! Error types for the Questrade API client.
//!
//! Every fallible operation in this crate returns [`Error`]. Nothing is
//! retried internally; the variant carries enough detail (an HTTP status or
//! the name of a missing credential field) for the caller to decide whether
//! to start over with fresh input.

use thiserror::Error;

use crate::auth::CredentialField;

/// A specialized `Result` type for Questrade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Questrade API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON body could not be parsed or did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credential could not be serialized for persistence
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Credential could not be written to its destination
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted credential is missing, unreadable or unparseable
    #[error("Malformed credential source: {0}")]
    MalformedSource(String),

    /// A required credential field was absent or empty
    #[error("{} was not provided.", .field.label())]
    IncompleteCredential {
        /// The first missing field in canonical order
        field: CredentialField,
    },

    /// The authorization endpoint answered with a non-success status
    #[error("Token exchange failed with status {status}")]
    AuthTransport {
        /// HTTP status code
        status: u16,
    },

    /// A domain endpoint answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// A request was attempted before any credential was installed
    #[error("No credential installed; acquire or load one first")]
    NotAuthenticated,

    /// The session failed an earlier acquire or refresh and cannot be reused
    #[error("Session failed; construct a new session")]
    SessionFailed,

    /// Neither an access code nor a credential store was supplied
    #[error("Either an access code or a credential store is required")]
    MissingAuthSource,

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Symbol lookup returned nothing
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AuthTransport { status } | Error::Transport { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    ///
    /// # Example
    ///
    /// ```
    /// use questrade_rs::Error;
    ///
    /// assert!(Error::NotAuthenticated.is_auth_error());
    /// assert!(!Error::InvalidInput("bad".into()).is_auth_error());
    /// ```
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::AuthTransport { .. }
                | Error::IncompleteCredential { .. }
                | Error::NotAuthenticated
                | Error::SessionFailed
                | Error::MissingAuthSource
        ) || matches!(self, Error::Transport { status: 401, .. })
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::AuthTransport { status } | Error::Transport { status, .. } => {
                (400..500).contains(status)
            }
            Error::InvalidInput(_) | Error::InvalidSymbol(_) | Error::MissingAuthSource => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::AuthTransport { status } | Error::Transport { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
