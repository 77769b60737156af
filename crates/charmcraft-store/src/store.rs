//! High-level Store operations.
//!
//! Each method is a short protocol over a [`Transport`]: build the
//! request(s), check the answer shape, return a plain value.

use std::path::Path;

use serde::Serialize;

use crate::config::{PollConfig, StoreConfig};
use crate::error::StoreError;
use crate::http::HttpTransport;
use crate::transport::Transport;
use crate::upload::{UploadJob, UploadOutcome};
use crate::wire::{
    self, CharmListResponse, RegisterNameRequest, RevisionRequest, RevisionResponse,
    WhoamiResponse,
};

const WHOAMI_PATH: &str = "/v1/whoami";
const CHARM_PATH: &str = "/v1/charm";

/// The authenticated user, as reported by the Store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Account username.
    pub username: String,
    /// Account id.
    pub userid: String,
}

/// A charm name owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredCharm {
    /// Charm name.
    pub name: String,
    /// Whether the charm is private.
    pub private: bool,
    /// Store-side status of the name.
    pub status: String,
}

/// Client for the Store API.
#[derive(Debug)]
pub struct Store<T = HttpTransport> {
    transport: T,
    poll: PollConfig,
}

impl Store<HttpTransport> {
    /// Creates a Store client talking HTTP with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use charmcraft_store::{Store, StoreConfig};
    ///
    /// let store = Store::new(StoreConfig::default())?;
    /// # Ok::<(), charmcraft_store::StoreError>(())
    /// ```
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.poll))
    }
}

impl<T: Transport> Store<T> {
    /// Creates a Store client over an arbitrary transport.
    #[must_use]
    pub const fn with_transport(transport: T, poll: PollConfig) -> Self {
        Self { transport, poll }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the polling configuration used by uploads.
    #[must_use]
    pub const fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Drops current credentials and authenticates again.
    ///
    /// The identity check forces the transport to establish fresh credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be cleared or the Store
    /// rejects the authentication.
    pub async fn login(&self) -> Result<(), StoreError> {
        self.transport.clear_credentials()?;
        self.transport.get(WHOAMI_PATH).await?;
        Ok(())
    }

    /// Drops current credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if stored credentials cannot be removed.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.transport.clear_credentials()
    }

    /// Returns the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or an identity field is missing.
    pub async fn whoami(&self) -> Result<Identity, StoreError> {
        let response = self.transport.get(WHOAMI_PATH).await?;
        let whoami: WhoamiResponse = wire::decode(WHOAMI_PATH, response)?;

        Ok(Identity {
            name: whoami.display_name,
            username: whoami.username,
            userid: whoami.id,
        })
    }

    /// Registers a charm name for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the Store refuses the registration.
    pub async fn register_name(&self, name: &str) -> Result<(), StoreError> {
        let body = wire::encode(&RegisterNameRequest { name })?;
        self.transport.post(CHARM_PATH, &body).await?;
        Ok(())
    }

    /// Lists the charm names owned by the authenticated user, in Store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is malformed.
    pub async fn list_registered_names(&self) -> Result<Vec<RegisteredCharm>, StoreError> {
        let response = self.transport.get(CHARM_PATH).await?;
        let listed: CharmListResponse = wire::decode(CHARM_PATH, response)?;

        Ok(listed
            .charms
            .into_iter()
            .map(|entry| RegisteredCharm {
                name: entry.name,
                private: entry.private,
                status: entry.status,
            })
            .collect())
    }

    /// Uploads a charm file and waits until the Store has processed it.
    ///
    /// # Arguments
    ///
    /// * `name` - Registered charm name.
    /// * `filepath` - Charm file to push.
    ///
    /// # Errors
    ///
    /// Returns an error if the push, the revision registration or any
    /// status poll fails.
    pub async fn upload(&self, name: &str, filepath: &Path) -> Result<UploadOutcome, StoreError> {
        let job = self.start_upload(name, filepath).await?;
        job.wait(&self.transport, &self.poll).await
    }

    /// Pushes the file and registers it as a new revision, without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the push or the registration fails.
    pub async fn start_upload(&self, name: &str, filepath: &Path) -> Result<UploadJob, StoreError> {
        let upload_id = self.transport.push(filepath).await?;

        let endpoint = format!("{CHARM_PATH}/{name}/revisions");
        let body = wire::encode(&RevisionRequest {
            upload_id: &upload_id,
        })?;
        let response = self.transport.post(&endpoint, &body).await?;
        let registered: RevisionResponse = wire::decode(&endpoint, response)?;

        tracing::debug!(
            "Upload {upload_id} started, got status url {}",
            registered.status_url
        );
        Ok(UploadJob::new(upload_id, registered.status_url))
    }
}
