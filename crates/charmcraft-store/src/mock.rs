//! Recording transport double for unit tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::StoreError;
use crate::transport::Transport;

/// A call received by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Post(String, Value),
    Push(PathBuf),
    ClearCredentials,
}

/// Transport answering from scripted queues and recording every call.
///
/// Unscripted `get`/`post` calls answer `null`; an unscripted `push` fails.
#[derive(Debug, Default)]
pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    gets: Mutex<VecDeque<Result<Value, StoreError>>>,
    posts: Mutex<VecDeque<Result<Value, StoreError>>>,
    pushes: Mutex<VecDeque<Result<String, StoreError>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(self, value: Value) -> Self {
        self.gets.lock().push_back(Ok(value));
        self
    }

    pub fn with_get_error(self, err: StoreError) -> Self {
        self.gets.lock().push_back(Err(err));
        self
    }

    pub fn with_post(self, value: Value) -> Self {
        self.posts.lock().push_back(Ok(value));
        self
    }

    pub fn with_push(self, upload_id: &str) -> Self {
        self.pushes.lock().push_back(Ok(upload_id.to_string()));
        self
    }

    pub fn with_push_error(self, err: StoreError) -> Self {
        self.pushes.lock().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.calls.lock().push(Call::Get(path.to_string()));
        self.gets.lock().pop_front().unwrap_or(Ok(Value::Null))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, StoreError> {
        self.calls
            .lock()
            .push(Call::Post(path.to_string(), body.clone()));
        self.posts.lock().pop_front().unwrap_or(Ok(Value::Null))
    }

    async fn push(&self, filepath: &Path) -> Result<String, StoreError> {
        self.calls.lock().push(Call::Push(filepath.to_path_buf()));
        self.pushes
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(StoreError::PushRejected {
                    message: "no push scripted".to_string(),
                })
            })
    }

    fn clear_credentials(&self) -> Result<(), StoreError> {
        self.calls.lock().push(Call::ClearCredentials);
        Ok(())
    }
}
