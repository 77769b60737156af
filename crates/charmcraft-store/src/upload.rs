//! Server-side upload job tracking.
//!
//! After the bytes are pushed and registered as a revision, the Store
//! processes them asynchronously. The job is followed by polling its
//! status URL until a status from the
//! [`EndingStatuses`](crate::EndingStatuses) table shows up.

use serde::Serialize;
use tokio::time::Instant;

use crate::config::PollConfig;
use crate::error::StoreError;
use crate::transport::Transport;
use crate::wire::{self, StatusResponse};

/// Final result of one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    /// Whether the ending status means success.
    pub ok: bool,
    /// Raw ending status reported by the Store.
    pub status: String,
    /// Revision assigned by the Store, if any.
    pub revision: Option<u64>,
}

/// An upload being processed by the Store.
#[derive(Debug, Clone)]
pub struct UploadJob {
    upload_id: String,
    status_url: String,
}

impl UploadJob {
    /// Creates a job for the given upload id and status URL.
    #[must_use]
    pub fn new(upload_id: impl Into<String>, status_url: impl Into<String>) -> Self {
        Self {
            upload_id: upload_id.into(),
            status_url: status_url.into(),
        }
    }

    /// Upload id returned by the push.
    #[must_use]
    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    /// URL reporting the job status.
    #[must_use]
    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    /// Polls the status URL until an ending status is reported.
    ///
    /// Each poll failure is returned right away.
    ///
    /// # Errors
    ///
    /// Returns an error if a poll fails, a status answer is malformed, or
    /// the configured deadline passes first.
    pub async fn wait<T: Transport + ?Sized>(
        &self,
        transport: &T,
        poll: &PollConfig,
    ) -> Result<UploadOutcome, StoreError> {
        let started = Instant::now();

        loop {
            let response = transport.get(&self.status_url).await?;
            tracing::debug!("Status checked: {response}");

            let status: StatusResponse = wire::decode(&self.status_url, response)?;
            let current = status
                .revisions
                .into_iter()
                .next()
                .ok_or_else(|| StoreError::malformed(&self.status_url, "empty `revisions` list"))?;

            if let Some(ok) = poll.ending_statuses.resolve(&current.status) {
                return Ok(UploadOutcome {
                    ok,
                    status: current.status,
                    revision: current.revision,
                });
            }

            if poll
                .timeout
                .is_some_and(|timeout| started.elapsed() + poll.delay > timeout)
            {
                return Err(StoreError::UploadTimedOut {
                    upload_id: self.upload_id.clone(),
                    status_url: self.status_url.clone(),
                    last_status: current.status,
                });
            }

            tokio::time::sleep(poll.delay).await;
        }
    }
}
