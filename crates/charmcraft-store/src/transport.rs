//! The capability the [`Store`](crate::Store) needs from the network layer.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// Raw access to the Store API.
///
/// Implementations own the credentials: they attach them to outgoing
/// requests and drop them on [`Transport::clear_credentials`]. The façade
/// never sees them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a `GET` and returns the decoded JSON body.
    ///
    /// `path` is either relative to the API root (`/v1/whoami`) or a full URL.
    async fn get(&self, path: &str) -> Result<Value, StoreError>;

    /// Issues a `POST` with a JSON body and returns the decoded JSON answer.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, StoreError>;

    /// Sends the file content to the storage service and returns its upload id.
    async fn push(&self, filepath: &Path) -> Result<String, StoreError>;

    /// Forgets any stored credentials. Clearing twice is not an error.
    fn clear_credentials(&self) -> Result<(), StoreError>;
}
