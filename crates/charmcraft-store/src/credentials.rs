//! File-backed storage for Store credentials.
//!
//! The token is kept as a small JSON document in the per-user data
//! directory. Nothing outside the transport looks at its content.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
struct StoredCredentials {
    token: String,
}

/// Default credential file (`<data dir>/charmcraft/credentials.json`).
fn default_credentials_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("charmcraft")
        .join("credentials.json")
}

/// Persistent credential storage.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(default_credentials_path())
    }
}

impl CredentialStore {
    /// Creates a store backed by the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the credential file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read. A file that
    /// does not parse is treated as absent.
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage_error(e)),
        };

        match serde_json::from_str::<StoredCredentials>(&content) {
            Ok(stored) => Ok(Some(stored.token)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable credentials"
                );
                Ok(None)
            }
        }
    }

    /// Persists a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be written.
    pub fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }

        let content = serde_json::to_string(&StoredCredentials {
            token: token.to_string(),
        })?;
        std::fs::write(&self.path, content).map_err(|e| self.storage_error(e))?;
        restrict_permissions(&self.path).map_err(|e| self.storage_error(e))?;

        tracing::debug!(path = %self.path.display(), "Credentials stored");
        Ok(())
    }

    /// Removes the stored token. Clearing when nothing is stored succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Credentials removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_error(e)),
        }
    }

    fn storage_error(&self, source: std::io::Error) -> StoreError {
        StoreError::CredentialStorage {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
