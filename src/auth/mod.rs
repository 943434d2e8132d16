//! Authentication and session management for the Questrade API.
//!
//! Questrade uses OAuth2 with single-use refresh tokens. A one-time access
//! code generated on the Questrade website is exchanged for a
//! [`Credential`], and every refresh exchanges the current refresh token for
//! a new credential that replaces the old one.
//!
//! # Acquiring a credential
//!
//! ```no_run
//! use questrade_rs::{ClientConfig, Session};
//! use questrade_rs::auth::YamlFileStore;
//!
//! # async fn example() -> questrade_rs::Result<()> {
//! let store = YamlFileStore::new("access_token.yml");
//! let session = Session::from_access_code(
//!     "your-access-code",
//!     Some(&store),
//!     &ClientConfig::default(),
//! ).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Resuming from a saved credential
//!
//! ```no_run
//! use questrade_rs::{ClientConfig, Session};
//! use questrade_rs::auth::{RefreshSource, YamlFileStore};
//!
//! # async fn example() -> questrade_rs::Result<()> {
//! let store = YamlFileStore::new("access_token.yml");
//! let session = Session::from_store(&store, &ClientConfig::default())?;
//!
//! // Mint a fresh token and write it back to the file
//! session.refresh(RefreshSource::Store(&store)).await?;
//! # Ok(())
//! # }
//! ```

mod credential;
mod session;
mod store;

pub use credential::{normalize_api_server, Credential, CredentialField};
pub use session::{RefreshSource, Session, SessionStatus};
pub use store::{
    credential_from_yaml, credential_to_yaml, CredentialStore, MemoryStore, YamlFileStore,
};
