//! Session management for Questrade API authentication.

use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use super::credential::{Credential, RawCredential};
use super::store::CredentialStore;
use crate::{ClientConfig, Error, Result};

/// Authentication session for the Questrade API.
///
/// The session owns exactly one current [`Credential`] and is the single
/// choke point for authenticated traffic: every domain request goes through
/// [`Session::dispatch`], which attaches the header derived from the
/// credential installed at that moment.
///
/// # Lifecycle
///
/// A session starts out uninitialized, becomes active once a credential is
/// acquired or loaded, and is replaced wholesale on every refresh. A failed
/// acquire or refresh leaves the session in a terminal failed state; build a
/// new session to start over.
///
/// # Thread Safety
///
/// `Session` is cheap to clone and safe to share across tasks. The credential
/// and its derived header are swapped together as one snapshot, so readers
/// never observe a header that belongs to a different token.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    http: reqwest::Client,
    auth_url: String,
    api_version: String,
    state: RwLock<SessionState>,
}

enum SessionState {
    Uninitialized,
    Active(Arc<ActiveCredential>),
    Failed,
}

/// A credential together with everything derived from it at install time.
struct ActiveCredential {
    credential: Credential,
    authorization: SecretString,
    expires_at: DateTime<Utc>,
}

impl ActiveCredential {
    fn new(credential: Credential) -> Result<Self> {
        let authorization = credential.authorization();
        HeaderValue::from_str(&authorization).map_err(|_| {
            Error::InvalidInput("credential contains characters not allowed in a header".into())
        })?;

        let lifetime = Duration::seconds(credential.expires_in().min(u32::MAX as u64) as i64);
        Ok(Self {
            credential,
            authorization: SecretString::from(authorization),
            expires_at: Utc::now() + lifetime,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut value = HeaderValue::from_str(self.authorization.expose_secret())
            .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

/// Observable state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No credential has been installed yet
    Uninitialized,
    /// A credential is installed and requests can be dispatched
    Active,
    /// An acquire or refresh failed; the session cannot be reused
    Failed,
}

/// Where [`Session::refresh`] reads the refresh token from.
#[derive(Clone, Copy)]
pub enum RefreshSource<'a> {
    /// The credential currently installed in the session.
    Current,
    /// A persisted credential. The refreshed credential is saved back to the
    /// same store.
    Store(&'a dyn CredentialStore),
}

impl Session {
    /// Create a session with no credential installed.
    ///
    /// Any call to [`dispatch`](Self::dispatch) fails with
    /// [`Error::NotAuthenticated`] until [`acquire`](Self::acquire) succeeds.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::build(config, SessionState::Uninitialized)
    }

    /// Create a session by exchanging a one-time access code.
    ///
    /// When `persist_to` is given, the resulting credential is saved there.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use questrade_rs::{ClientConfig, Session};
    /// use questrade_rs::auth::YamlFileStore;
    ///
    /// # async fn example() -> questrade_rs::Result<()> {
    /// let store = YamlFileStore::new("access_token.yml");
    /// let session = Session::from_access_code(
    ///     "your-access-code",
    ///     Some(&store),
    ///     &ClientConfig::default(),
    /// ).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn from_access_code(
        access_code: &str,
        persist_to: Option<&dyn CredentialStore>,
        config: &ClientConfig,
    ) -> Result<Self> {
        let session = Self::new(config)?;
        session.acquire(access_code, persist_to).await?;
        Ok(session)
    }

    /// Create an active session from an existing credential, without any
    /// network round-trip.
    pub fn from_credential(credential: Credential, config: &ClientConfig) -> Result<Self> {
        let active = ActiveCredential::new(credential)?;
        Self::build(config, SessionState::Active(Arc::new(active)))
    }

    /// Create an active session from a persisted credential.
    pub fn from_store(store: &dyn CredentialStore, config: &ClientConfig) -> Result<Self> {
        Self::from_credential(store.load()?, config)
    }

    /// Create a session from whichever source the caller has.
    ///
    /// An access code takes precedence and the new credential is persisted to
    /// `store` when one is given; otherwise the credential is loaded from
    /// `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAuthSource`] when neither is supplied.
    pub async fn connect(
        access_code: Option<&str>,
        store: Option<&dyn CredentialStore>,
        config: &ClientConfig,
    ) -> Result<Self> {
        match (access_code, store) {
            (Some(code), store) => Self::from_access_code(code, store, config).await,
            (None, Some(store)) => Self::from_store(store, config),
            (None, None) => Err(Error::MissingAuthSource),
        }
    }

    fn build(config: &ClientConfig, state: SessionState) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                http,
                auth_url: config.auth_url.clone(),
                api_version: config.api_version.clone(),
                state: RwLock::new(state),
            }),
        })
    }

    /// Exchange a one-time access code for a credential and install it.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthTransport`] if the token endpoint returns a non-2xx status
    /// - [`Error::IncompleteCredential`] if the response lacks a required field
    /// - [`Error::SessionFailed`] if the session already failed
    ///
    /// Any failure of the exchange itself leaves the session failed.
    pub async fn acquire(
        &self,
        access_code: &str,
        persist_to: Option<&dyn CredentialStore>,
    ) -> Result<Credential> {
        let mut state = self.inner.state.write().await;
        if matches!(*state, SessionState::Failed) {
            return Err(Error::SessionFailed);
        }

        let active = self
            .exchange(access_code)
            .await
            .map_err(|e| mark_failed(&mut state, e))?;
        let credential = install(&mut state, active);
        drop(state);

        if let Some(store) = persist_to {
            store.save(&credential)?;
        }
        Ok(credential)
    }

    /// Exchange the refresh token for a new credential and install it.
    ///
    /// The previous credential is discarded; its refresh token is no longer
    /// valid on the server once this succeeds.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] if refreshing from [`RefreshSource::Current`]
    ///   before any credential is installed
    /// - [`Error::AuthTransport`] if the token endpoint returns a non-2xx status
    /// - [`Error::IncompleteCredential`] if the response lacks a required field
    /// - [`Error::SessionFailed`] if the session already failed
    pub async fn refresh(&self, source: RefreshSource<'_>) -> Result<Credential> {
        let mut state = self.inner.state.write().await;
        if matches!(*state, SessionState::Failed) {
            return Err(Error::SessionFailed);
        }

        let refresh_token = match source {
            RefreshSource::Current => match &*state {
                SessionState::Active(active) => active.credential.refresh_token().to_string(),
                _ => return Err(Error::NotAuthenticated),
            },
            RefreshSource::Store(store) => store
                .load()
                .map_err(|e| mark_failed(&mut state, e))?
                .refresh_token()
                .to_string(),
        };

        let active = self
            .exchange(&refresh_token)
            .await
            .map_err(|e| mark_failed(&mut state, e))?;
        let credential = install(&mut state, active);
        drop(state);

        if let RefreshSource::Store(store) = source {
            store.save(&credential)?;
        }
        Ok(credential)
    }

    /// Send an authenticated request to a domain endpoint.
    ///
    /// The URL is `<api_server>/<api_version>/<endpoint>`. The JSON body of a
    /// successful response is returned as-is; an empty body yields
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] if no credential is installed (nothing is sent)
    /// - [`Error::Transport`] on any non-2xx status; the body is discarded
    ///
    /// # Example
    ///
    /// ```no_run
    /// use reqwest::Method;
    ///
    /// # async fn example(session: questrade_rs::Session) -> questrade_rs::Result<()> {
    /// let accounts = session.dispatch(Method::GET, "accounts", &[], None).await?;
    /// println!("{accounts}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let active = self.active().await?;
        let url = Url::parse(&format!(
            "{}/{}/{}",
            active.credential.api_server(),
            self.inner.api_version,
            endpoint.trim_start_matches('/')
        ))?;

        tracing::debug!(%method, %url, "Dispatching request");

        let mut request = self
            .inner
            .http
            .request(method, url.clone())
            .headers(active.headers()?);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "Request failed");
            return Err(Error::Transport {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The currently installed credential.
    pub async fn credential(&self) -> Result<Credential> {
        Ok(self.active().await?.credential.clone())
    }

    /// The headers attached to every dispatched request.
    pub async fn headers(&self) -> Result<HeaderMap> {
        self.active().await?.headers()
    }

    /// The current lifecycle state.
    pub async fn status(&self) -> SessionStatus {
        match &*self.inner.state.read().await {
            SessionState::Uninitialized => SessionStatus::Uninitialized,
            SessionState::Active(_) => SessionStatus::Active,
            SessionState::Failed => SessionStatus::Failed,
        }
    }

    /// When the installed access token stops being valid.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.active().await.ok().map(|active| active.expires_at)
    }

    /// Check if the access token has expired. A session without a
    /// credential counts as expired.
    pub async fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero()).await
    }

    /// Check if the access token will expire within the given buffer period.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        match self.expires_at().await {
            Some(expires_at) => match Utc::now().checked_add_signed(buffer) {
                Some(deadline) => deadline >= expires_at,
                None => true,
            },
            None => true,
        }
    }

    async fn active(&self) -> Result<Arc<ActiveCredential>> {
        match &*self.inner.state.read().await {
            SessionState::Active(active) => Ok(Arc::clone(active)),
            SessionState::Uninitialized => Err(Error::NotAuthenticated),
            SessionState::Failed => Err(Error::SessionFailed),
        }
    }

    async fn exchange(&self, token: &str) -> Result<ActiveCredential> {
        let response = self
            .inner
            .http
            .get(&self.inner.auth_url)
            .query(&[("grant_type", "refresh_token"), ("refresh_token", token)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::AuthTransport {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let raw: RawCredential = serde_json::from_str(&body)?;
        ActiveCredential::new(raw.validate()?)
    }
}

fn install(state: &mut SessionState, active: ActiveCredential) -> Credential {
    let credential = active.credential.clone();
    tracing::info!(
        api_server = %credential.api_server(),
        expires_in = credential.expires_in(),
        "Installed credential"
    );
    *state = SessionState::Active(Arc::new(active));
    credential
}

fn mark_failed(state: &mut SessionState, err: Error) -> Error {
    tracing::warn!(error = %err, "Token exchange failed; session is no longer usable");
    *state = SessionState::Failed;
    err
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth_url", &self.inner.auth_url)
            .field("api_version", &self.inner.api_version)
            .field("authorization", &"[REDACTED]")
            .finish()
    }
}
