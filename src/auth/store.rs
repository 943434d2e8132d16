//! Persistence of credentials as a flat YAML record.
//!
//! The persisted form has exactly the five credential fields as top-level
//! keys:
//!
//! ```yaml
//! access_token: hunter2
//! api_server: http://www.api_url.com
//! expires_in: 1234
//! refresh_token: hunter2
//! token_type: Bearer
//! ```
//!
//! Loading always re-validates, since nothing in the file format enforces
//! the schema.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::credential::{Credential, RawCredential};
use crate::{Error, Result};

/// A medium a [`Credential`] can be loaded from and saved to.
///
/// Stores are passed explicitly to the session operations that need them;
/// there is no implicit default location.
pub trait CredentialStore: Send + Sync {
    /// Read and validate the stored credential.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedSource`] if the record is missing or unparseable
    /// - [`Error::IncompleteCredential`] if a required field is absent
    fn load(&self) -> Result<Credential>;

    /// Replace whatever is stored with `credential`.
    fn save(&self, credential: &Credential) -> Result<()>;
}

/// Parse a credential from its YAML representation.
pub fn credential_from_yaml(text: &str) -> Result<Credential> {
    let raw: RawCredential =
        serde_yaml::from_str(text).map_err(|e| Error::MalformedSource(e.to_string()))?;
    raw.validate()
}

/// Serialize a credential to its YAML representation.
pub fn credential_to_yaml(credential: &Credential) -> Result<String> {
    Ok(serde_yaml::to_string(credential)?)
}

/// A credential stored in a YAML file on disk.
///
/// # Example
///
/// ```no_run
/// use questrade_rs::auth::{CredentialStore, YamlFileStore};
///
/// # fn example() -> questrade_rs::Result<()> {
/// let store = YamlFileStore::new("access_token.yml");
/// let credential = store.load()?;
/// println!("API server: {}", credential.api_server());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileStore {
    path: PathBuf,
}

impl YamlFileStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for YamlFileStore {
    fn load(&self) -> Result<Credential> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            Error::MalformedSource(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        credential_from_yaml(&text)
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let text = credential_to_yaml(credential)?;
        fs::write(&self.path, text)?;
        tracing::debug!(path = %self.path.display(), "Saved credential");
        Ok(())
    }
}

/// A credential held in process memory in its persisted form.
///
/// Useful for handing a credential between sessions without touching the
/// filesystem; loads go through the same validation as a file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with a YAML record.
    pub fn from_yaml(text: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(text.into())),
        }
    }

    /// The raw record currently stored, if any.
    pub fn contents(&self) -> Option<String> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Credential> {
        let record = self.contents().ok_or_else(|| {
            Error::MalformedSource("no credential has been stored".to_string())
        })?;
        credential_from_yaml(&record)
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let text = credential_to_yaml(credential)?;
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(text);
        Ok(())
    }
}
