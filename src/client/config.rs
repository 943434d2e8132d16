//! Client configuration options.

use std::time::Duration;

use crate::Environment;

/// Configuration for the Questrade client and its session.
///
/// # Example
///
/// ```
/// use questrade_rs::{ClientConfig, Environment};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_environment(Environment::Practice)
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// assert_eq!(config.auth_url, "https://practicelogin.questrade.com/oauth2/token");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout applied to every HTTP call
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Full URL of the OAuth token endpoint
    pub auth_url: String,
    /// Path segment inserted between `api_server` and the endpoint
    pub api_version: String,
    /// Whether to refresh from the in-memory credential before a request
    /// once the token is about to expire
    pub auto_refresh_session: bool,
    /// How long before expiry to refresh
    pub refresh_buffer: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("questrade-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            auth_url: Environment::Production.token_url(),
            api_version: "v1".to_string(),
            auto_refresh_session: false,
            refresh_buffer: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Point token exchanges at the login server of `env`.
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.auth_url = env.token_url();
        self
    }

    /// Override the token endpoint URL.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Set the API version path segment.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Enable or disable automatic session refresh.
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh_session = enabled;
        self
    }

    /// Set the buffer time before expiry to refresh.
    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }
}
