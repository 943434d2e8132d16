//! The OAuth credential record and its validation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// The five fields every credential must carry, in canonical order.
///
/// Validation walks this order and reports the first missing field, so the
/// error for a record missing several fields is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialField {
    /// `access_token`
    AccessToken,
    /// `api_server`
    ApiServer,
    /// `expires_in`
    ExpiresIn,
    /// `refresh_token`
    RefreshToken,
    /// `token_type`
    TokenType,
}

impl CredentialField {
    /// All fields in validation order.
    pub const ALL: [CredentialField; 5] = [
        CredentialField::AccessToken,
        CredentialField::ApiServer,
        CredentialField::ExpiresIn,
        CredentialField::RefreshToken,
        CredentialField::TokenType,
    ];

    /// The key used in token responses and persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialField::AccessToken => "access_token",
            CredentialField::ApiServer => "api_server",
            CredentialField::ExpiresIn => "expires_in",
            CredentialField::RefreshToken => "refresh_token",
            CredentialField::TokenType => "token_type",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            CredentialField::AccessToken => "Access token",
            CredentialField::ApiServer => "API server",
            CredentialField::ExpiresIn => "Expiry",
            CredentialField::RefreshToken => "Refresh token",
            CredentialField::TokenType => "Token type",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated session record issued by the authorization endpoint.
///
/// A `Credential` can only be built through validation, so holding one means
/// all five fields are present and `api_server` is in canonical form (no
/// backslashes, no trailing `/`). It is immutable; a refresh produces a new
/// value.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    access_token: String,
    api_server: String,
    expires_in: u64,
    refresh_token: String,
    token_type: String,
}

impl Credential {
    /// Build a credential from its parts, validating and normalizing them.
    ///
    /// # Example
    ///
    /// ```
    /// use questrade_rs::auth::Credential;
    ///
    /// let credential = Credential::new(
    ///     "access",
    ///     "https://api01.iq.questrade.com/",
    ///     1800,
    ///     "refresh",
    ///     "Bearer",
    /// )?;
    /// assert_eq!(credential.api_server(), "https://api01.iq.questrade.com");
    /// # Ok::<(), questrade_rs::Error>(())
    /// ```
    pub fn new(
        access_token: impl Into<String>,
        api_server: impl Into<String>,
        expires_in: u64,
        refresh_token: impl Into<String>,
        token_type: impl Into<String>,
    ) -> Result<Self> {
        RawCredential {
            access_token: Some(access_token.into()),
            api_server: Some(api_server.into()),
            expires_in: Some(expires_in),
            refresh_token: Some(refresh_token.into()),
            token_type: Some(token_type.into()),
        }
        .validate()
    }

    /// The opaque bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Base URL for all domain requests, without a trailing `/`.
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Seconds of validity from issuance.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// Single-use token for minting the next credential.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Authorization scheme, usually `Bearer`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// The `Authorization` header value for this credential.
    pub(crate) fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("api_server", &self.api_server)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Untrusted credential fields as they arrive from the network or a store.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCredential {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    api_server: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl RawCredential {
    /// Check every required field in canonical order, then normalize.
    pub(crate) fn validate(self) -> Result<Credential> {
        let access_token = required(self.access_token, CredentialField::AccessToken)?;
        let api_server = required(self.api_server, CredentialField::ApiServer)?;
        let expires_in = self.expires_in.ok_or(Error::IncompleteCredential {
            field: CredentialField::ExpiresIn,
        })?;
        let refresh_token = required(self.refresh_token, CredentialField::RefreshToken)?;
        let token_type = required(self.token_type, CredentialField::TokenType)?;

        Ok(Credential {
            access_token,
            api_server: normalize_api_server(&api_server),
            expires_in,
            refresh_token,
            token_type,
        })
    }
}

fn required(value: Option<String>, field: CredentialField) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(Error::IncompleteCredential { field })
}

/// Strip backslash escapes and at most one trailing `/`.
///
/// Idempotent for any input that does not end in `//`.
pub fn normalize_api_server(raw: &str) -> String {
    let cleaned = raw.replace('\\', "");
    match cleaned.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => cleaned,
    }
}
