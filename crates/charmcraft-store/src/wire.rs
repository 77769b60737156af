//! JSON shapes exchanged with the Store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// `GET /v1/whoami`.
#[derive(Debug, Deserialize)]
pub(crate) struct WhoamiResponse {
    #[serde(rename = "display-name")]
    pub display_name: String,
    pub username: String,
    pub id: String,
}

/// `GET /v1/charm`.
#[derive(Debug, Deserialize)]
pub(crate) struct CharmListResponse {
    pub charms: Vec<CharmEntry>,
}

/// One `charms` entry.
#[derive(Debug, Deserialize)]
pub(crate) struct CharmEntry {
    pub name: String,
    pub private: bool,
    pub status: String,
}

/// `POST /v1/charm` body.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterNameRequest<'a> {
    pub name: &'a str,
}

/// `POST /v1/charm/{name}/revisions` body.
#[derive(Debug, Serialize)]
pub(crate) struct RevisionRequest<'a> {
    #[serde(rename = "upload-id")]
    pub upload_id: &'a str,
}

/// `POST /v1/charm/{name}/revisions` answer.
#[derive(Debug, Deserialize)]
pub(crate) struct RevisionResponse {
    #[serde(rename = "status-url")]
    pub status_url: String,
}

/// `GET <status-url>`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    pub revisions: Vec<RevisionStatus>,
}

/// One entry of the status answer.
#[derive(Debug, Deserialize)]
pub(crate) struct RevisionStatus {
    pub status: String,
    pub revision: Option<u64>,
}

/// Storage answer to a push.
#[derive(Debug, Deserialize)]
pub(crate) struct PushResponse {
    pub successful: bool,
    pub upload_id: Option<String>,
}

/// Store error body (`{"error-list": [{"code": .., "message": ..}]}`).
#[derive(Debug, Deserialize)]
struct ErrorList {
    #[serde(rename = "error-list")]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    code: Option<String>,
    message: String,
}

/// Decodes `value` into `T`, reporting shape problems against `endpoint`.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::malformed(endpoint, e))
}

/// Serializes a request body.
pub(crate) fn encode<T: Serialize>(body: &T) -> Result<Value, StoreError> {
    serde_json::to_value(body).map_err(Into::into)
}

/// Turns an error body into a readable message, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorList>(body) {
        Ok(list) if !list.errors.is_empty() => list
            .errors
            .iter()
            .map(|e| match &e.code {
                Some(code) => format!("{code}: {}", e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_whoami() {
        let value = json!({"display-name": "John Doe", "username": "jdoe", "id": "-1"});
        let whoami: WhoamiResponse = decode("/v1/whoami", value).unwrap();
        assert_eq!(whoami.display_name, "John Doe");
        assert_eq!(whoami.username, "jdoe");
        assert_eq!(whoami.id, "-1");
    }

    #[test]
    fn test_decode_reports_endpoint() {
        let err = decode::<RevisionResponse>("/v1/charm/x/revisions", json!({})).unwrap_err();
        match err {
            StoreError::MalformedResponse { endpoint, message } => {
                assert_eq!(endpoint, "/v1/charm/x/revisions");
                assert!(message.contains("status-url"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_status_with_null_revision() {
        let value = json!({"revisions": [{"status": "scanning", "revision": null}]});
        let status: StatusResponse = decode("status", value).unwrap();
        assert_eq!(status.revisions[0].status, "scanning");
        assert_eq!(status.revisions[0].revision, None);
    }

    #[test]
    fn test_encode_revision_request() {
        let body = encode(&RevisionRequest { upload_id: "U" }).unwrap();
        assert_eq!(body, json!({"upload-id": "U"}));
    }

    #[test]
    fn test_error_message_from_error_list() {
        let body = r#"{"error-list": [
            {"code": "not-found", "message": "no such charm"},
            {"message": "bye"}
        ]}"#;
        assert_eq!(error_message(body), "not-found: no such charm; bye");
    }

    #[test]
    fn test_error_message_raw_fallback() {
        assert_eq!(error_message("<html>oops</html>"), "<html>oops</html>");
    }
}
