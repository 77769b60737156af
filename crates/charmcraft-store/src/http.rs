//! reqwest-backed [`Transport`] talking to the real Store.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Body, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::config::StoreConfig;
use crate::credentials::CredentialStore;
use crate::error::StoreError;
use crate::transport::Transport;
use crate::wire::{self, PushResponse};

/// HTTP transport for the Store API and its storage service.
#[derive(Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    api_url: String,
    storage_url: String,
    credentials: CredentialStore,
    token: Mutex<Option<String>>,
    login_token: Option<String>,
}

impl HttpTransport {
    /// Creates a transport from the given configuration.
    ///
    /// Previously stored credentials are loaded right away.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the
    /// credential file cannot be read.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let credentials = config
            .credentials_path
            .as_ref()
            .map_or_else(CredentialStore::default, |path| CredentialStore::new(path.clone()));
        let token = credentials.load()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| StoreError::ConnectionFailed {
                url: config.api_url.clone(),
                source: e,
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            storage_url: config.storage_url.clone(),
            credentials,
            token: Mutex::new(token),
            login_token: config.login_token.clone(),
        })
    }

    /// Returns the credential store in use.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Whether a token is currently attached to requests.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.token.lock().is_some()
    }

    /// Resolves an API path, or passes full URLs through.
    fn resolve(&self, path: &str) -> Result<Url, StoreError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.api_url)
        } else {
            format!("{}/{path}", self.api_url)
        };

        Url::parse(&raw).map_err(|_| StoreError::InvalidUrl { url: raw })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.token.lock().clone();
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("Macaroon {token}")),
            None => request,
        }
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<Response, StoreError> {
        let mut request = self.authorized(self.http.request(method.clone(), url.clone()));
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Sends a request, answering one authentication challenge if possible.
    ///
    /// The login token is persisted only once the Store accepts it. A
    /// rejected retry restores the token held before the challenge.
    async fn hit(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, StoreError> {
        let url = self.resolve(path)?;
        tracing::debug!(%method, %url, "Hitting the Store");

        let previous = self.token.lock().clone();
        let mut response = self.send(&method, &url, body).await?;
        if response.status() == StatusCode::UNAUTHORIZED && self.use_login_token() {
            let retried = self.send(&method, &url, body).await;
            match &retried {
                Ok(answer) if !is_rejection(answer.status()) => self.persist_login_token()?,
                _ => *self.token.lock() = previous,
            }
            response = retried?;
        }

        Self::into_json(url.as_str(), response).await
    }

    /// Attaches the login token after a challenge, in memory only.
    ///
    /// Returns `false` when there is nothing new to try.
    fn use_login_token(&self) -> bool {
        let Some(login_token) = &self.login_token else {
            return false;
        };

        let mut current = self.token.lock();
        if current.as_deref() == Some(login_token.as_str()) {
            return false;
        }
        *current = Some(login_token.clone());
        drop(current);

        tracing::debug!("Store asked for authentication, retrying with login token");
        true
    }

    fn persist_login_token(&self) -> Result<(), StoreError> {
        match &self.login_token {
            Some(login_token) => self.credentials.save(login_token),
            None => Ok(()),
        }
    }

    async fn into_json(endpoint: &str, response: Response) -> Result<Value, StoreError> {
        let status = response.status();
        let body = response.text().await?;

        if is_rejection(status) {
            return Err(StoreError::AuthenticationFailed {
                message: format!("[{}] {}", status.as_u16(), wire::error_message(&body)),
            });
        }

        if !status.is_success() {
            return Err(StoreError::HttpError {
                status: status.as_u16(),
                message: wire::error_message(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| StoreError::malformed(endpoint, e))
    }
}

fn is_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.hit(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, StoreError> {
        self.hit(Method::POST, path, Some(body)).await
    }

    async fn push(&self, filepath: &Path) -> Result<String, StoreError> {
        tracing::debug!(path = %filepath.display(), "Starting to push");

        let access = |source: io::Error| StoreError::FileAccess {
            path: filepath.to_path_buf(),
            source,
        };
        let file = tokio::fs::File::open(filepath).await.map_err(access)?;
        let metadata = file.metadata().await.map_err(access)?;
        if !metadata.is_file() {
            return Err(access(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let size = metadata.len();
        let file_name = filepath
            .file_name()
            .map_or_else(|| "charm".to_string(), |n| n.to_string_lossy().into_owned());

        let body = Body::wrap_stream(ReaderStream::new(file));
        let part = multipart::Part::stream_with_length(body, size)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("binary", part);

        let url = format!("{}/unscanned-upload/", self.storage_url);
        let response = self
            .authorized(self.http.post(&url))
            .multipart(form)
            .send()
            .await?;

        let raw = Self::into_json(&url, response).await?;
        let pushed: PushResponse = wire::decode(&url, raw.clone())?;
        if !pushed.successful {
            return Err(StoreError::PushRejected {
                message: raw.to_string(),
            });
        }

        let upload_id = pushed
            .upload_id
            .ok_or_else(|| StoreError::malformed(&url, "missing field `upload_id`"))?;
        tracing::debug!(upload_id = %upload_id, size, "Uploading bytes ended");
        Ok(upload_id)
    }

    fn clear_credentials(&self) -> Result<(), StoreError> {
        self.credentials.clear()?;
        *self.token.lock() = None;
        Ok(())
    }
}
