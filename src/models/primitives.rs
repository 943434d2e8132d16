//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around identifiers
//! to prevent mixing up different kinds of IDs at compile time.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A strongly-typed account number.
///
/// Questrade reports account numbers as strings, but older payloads carry
/// them as integers; both deserialize to the same value.
///
/// # Example
///
/// ```
/// use questrade_rs::AccountNumber;
///
/// let account = AccountNumber::new("26598145");
/// println!("Account: {}", account);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Create a new account number from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the account number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AccountNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(u64),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Self(s),
            Repr::Number(n) => Self(n.to_string()),
        })
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccountNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Questrade's internal numeric identifier for a symbol.
///
/// Quote and candle endpoints are keyed by this ID rather than by ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(u64);

impl SymbolId {
    /// Wrap a raw symbol ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw numeric ID.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SymbolId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Environment configuration for the Questrade API.
///
/// Determines which login server issues tokens. The API server itself is
/// always taken from the issued credential.
///
/// # Example
///
/// ```
/// use questrade_rs::Environment;
///
/// let env = Environment::Practice;
/// println!("Token URL: {}", env.token_url());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production environment - real trading with real money.
    #[default]
    Production,
    /// Practice account environment.
    Practice,
}

impl Environment {
    /// Get the base URL of the login server.
    pub fn login_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://login.questrade.com",
            Environment::Practice => "https://practicelogin.questrade.com",
        }
    }

    /// Get the OAuth token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.login_base_url())
    }

    /// Returns `true` if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Practice => write!(f, "practice"),
        }
    }
}
