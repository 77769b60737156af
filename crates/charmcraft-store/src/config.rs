//! Configuration types for the Store client.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default Store API location.
pub const DEFAULT_API_URL: &str = "https://api.staging.charmhub.io";

/// Default location of the service receiving charm bytes.
pub const DEFAULT_STORAGE_URL: &str = "https://storage.staging.snapcraftcontent.com";

/// Configuration for the Store client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store API URL (e.g., "<https://api.charmhub.io>").
    pub api_url: String,

    /// Storage URL where charm files are pushed.
    pub storage_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Credential file location; `None` uses the per-user data directory.
    pub credentials_path: Option<PathBuf>,

    /// Token handed to the Store when it challenges an unauthenticated request.
    pub login_token: Option<String>,

    /// Upload status polling settings.
    pub poll: PollConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_STORAGE_URL)
    }
}

impl StoreConfig {
    /// Creates a new configuration for the given API and storage URLs.
    ///
    /// # Examples
    ///
    /// ```
    /// use charmcraft_store::StoreConfig;
    ///
    /// let config = StoreConfig::new("https://api.example.com", "https://storage.example.com");
    /// assert_eq!(config.api_url, "https://api.example.com");
    /// ```
    #[must_use]
    pub fn new(api_url: impl Into<String>, storage_url: impl Into<String>) -> Self {
        Self {
            api_url: trim_url(api_url.into()),
            storage_url: trim_url(storage_url.into()),
            timeout: Duration::from_secs(30),
            credentials_path: None,
            login_token: None,
            user_agent: format!("charmcraft-store/{}", env!("CARGO_PKG_VERSION")),
            poll: PollConfig::default(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the credential file location.
    #[must_use]
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Sets the token used to answer an authentication challenge.
    #[must_use]
    pub fn with_login_token(mut self, token: impl Into<String>) -> Self {
        self.login_token = Some(token.into());
        self
    }

    /// Sets the upload polling configuration.
    #[must_use]
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// How the upload job status is polled.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between two status checks.
    pub delay: Duration,

    /// Give up after this long; `None` polls until an ending status shows up.
    pub timeout: Option<Duration>,

    /// Statuses that end the upload job.
    pub ending_statuses: EndingStatuses,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            timeout: None,
            ending_statuses: EndingStatuses::default(),
        }
    }
}

impl PollConfig {
    /// Sets the delay between status checks.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets an overall deadline for the polling.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the ending status table.
    #[must_use]
    pub fn with_ending_statuses(mut self, statuses: EndingStatuses) -> Self {
        self.ending_statuses = statuses;
        self
    }
}

/// Table of upload statuses that end the job, with whether each one means success.
///
/// # Examples
///
/// ```
/// use charmcraft_store::EndingStatuses;
///
/// let statuses = EndingStatuses::default().with_status("quarantined", false);
/// assert_eq!(statuses.resolve("approved"), Some(true));
/// assert_eq!(statuses.resolve("quarantined"), Some(false));
/// assert_eq!(statuses.resolve("scanning"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingStatuses(HashMap<String, bool>);

impl Default for EndingStatuses {
    fn default() -> Self {
        Self::empty()
            .with_status("approved", true)
            .with_status("rejected", false)
    }
}

impl EndingStatuses {
    /// Creates a table with no ending status at all.
    #[must_use]
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Adds (or overrides) an ending status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>, ok: bool) -> Self {
        self.0.insert(status.into(), ok);
        self
    }

    /// Returns the resolution for `status`, or `None` if the job is still going.
    #[must_use]
    pub fn resolve(&self, status: &str) -> Option<bool> {
        self.0.get(status).copied()
    }

    /// Number of known ending statuses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for EndingStatuses {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(s, ok)| (s.into(), ok)).collect())
    }
}
