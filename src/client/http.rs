//! HTTP client implementation for the Questrade API.

use chrono::Duration;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::api::{AccountsService, MarketDataService};
use crate::auth::{CredentialStore, RefreshSource, Session};
use crate::{Credential, Result};

use super::config::ClientConfig;

/// The main client for interacting with the Questrade API.
///
/// This client provides access to all API services through method calls
/// that return service structs. Every request is sent through the
/// underlying [`Session`], which attaches the current credential.
///
/// A client built from a credential store keeps it: every refresh the
/// client performs on its own is written back there, so the stored refresh
/// token is never one the server has already consumed.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use questrade_rs::{ClientConfig, QuestradeClient};
/// use questrade_rs::auth::YamlFileStore;
///
/// # async fn example() -> questrade_rs::Result<()> {
/// let store = Arc::new(YamlFileStore::new("access_token.yml"));
/// let client = QuestradeClient::from_store(store, ClientConfig::default())?;
///
/// for account in client.accounts().list().await? {
///     let positions = client.accounts().positions(&account.number).await?;
///     println!("{}: {} positions", account.number, positions.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct QuestradeClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
    pub(crate) store: Option<Arc<dyn CredentialStore>>,
}

impl QuestradeClient {
    /// Create a new client by exchanging a one-time access code.
    ///
    /// When `persist_to` is given, the issued credential is saved there and
    /// the client keeps saving refreshed credentials to it.
    pub async fn from_access_code(
        access_code: &str,
        persist_to: Option<Arc<dyn CredentialStore>>,
        config: ClientConfig,
    ) -> Result<Self> {
        let session =
            Session::from_access_code(access_code, persist_to.as_deref(), &config).await?;
        Ok(Self::build(session, config, persist_to))
    }

    /// Create a new client from a persisted credential.
    pub fn from_store(store: Arc<dyn CredentialStore>, config: ClientConfig) -> Result<Self> {
        let session = Session::from_store(store.as_ref(), &config)?;
        Ok(Self::build(session, config, Some(store)))
    }

    /// Create a new client from whichever source the caller has.
    ///
    /// See [`Session::connect`].
    pub async fn connect(
        access_code: Option<&str>,
        store: Option<Arc<dyn CredentialStore>>,
        config: ClientConfig,
    ) -> Result<Self> {
        let session = Session::connect(access_code, store.as_deref(), &config).await?;
        Ok(Self::build(session, config, store))
    }

    /// Create a new client with an existing session and custom configuration.
    ///
    /// Refreshes made by this client are not persisted anywhere.
    pub fn with_session(session: Session, config: ClientConfig) -> Self {
        Self::build(session, config, None)
    }

    fn build(
        session: Session,
        config: ClientConfig,
        store: Option<Arc<dyn CredentialStore>>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                session,
                config,
                store,
            }),
        }
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the market data service.
    pub fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    /// Manually refresh the session token.
    pub async fn refresh_session(&self, source: RefreshSource<'_>) -> Result<Credential> {
        self.inner.session.refresh(source).await
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }
}

impl ClientInner {
    /// Refresh from the in-memory credential if it is about to expire, and
    /// save the result to the client's store.
    pub(crate) async fn ensure_session_valid(&self) -> Result<()> {
        if !self.config.auto_refresh_session {
            return Ok(());
        }

        // A buffer too large for chrono covers any token lifetime
        let due = match Duration::from_std(self.config.refresh_buffer) {
            Ok(buffer) => self.session.expires_within(buffer).await,
            Err(_) => true,
        };
        if due {
            tracing::debug!("Access token about to expire; refreshing");
            let credential = self.session.refresh(RefreshSource::Current).await?;
            if let Some(store) = &self.store {
                store.save(&credential)?;
            }
        }
        Ok(())
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.get_with_query(endpoint, &[]).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.ensure_session_valid().await?;
        let body = self
            .session
            .dispatch(Method::GET, endpoint, query, None)
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}

impl Clone for QuestradeClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for QuestradeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestradeClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
