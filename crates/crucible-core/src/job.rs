//! Job and response types exchanged with the message bus boundary.
//!
//! A [`Job`] exists for the duration of one inbound request. Its
//! [`fingerprint`](Job::fingerprint) — the SHA-1 of the payload bytes — is
//! the key used for dedup-cache lookups, so two requests carrying the same
//! payload are indistinguishable to the expensive path.

use serde::Serialize;
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};

/// Computes the content fingerprint of a payload: lowercase hex SHA-1.
pub fn fingerprint(payload: &[u8]) -> String {
    hex::encode(Sha1::digest(payload))
}

// =============================================================================
// Job
// =============================================================================

/// One inbound unit of work, addressed to a topic on the external bus.
#[derive(Debug, Clone)]
pub struct Job {
    /// Topic / correlation id the response must carry back.
    pub topic: String,
    /// Raw payload bytes (for the captcha service: the image).
    pub payload: Vec<u8>,
    /// MIME type declared by the sender, if any.
    pub mime_type: Option<String>,
    /// Original filename, if the sender provided one.
    pub filename: Option<String>,
    /// Additional request metadata, passed through untouched.
    pub metadata: Map<String, Value>,
}

impl Job {
    /// Creates a job with only a topic and payload.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            mime_type: None,
            filename: None,
            metadata: Map::new(),
        }
    }

    /// Sets the declared MIME type.
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Sets the original filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Content fingerprint of the payload, used as the dedup key.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.payload)
    }
}

// =============================================================================
// JobResponse
// =============================================================================

/// Outcome of one job, success or error, always bound to its topic.
///
/// Serializes to the flat mapping the bus expects:
/// `{topic, text, mime_type}` on success, `{topic, error}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobResponse {
    /// Topic / correlation id of the originating job.
    pub topic: String,
    /// Success or error body.
    #[serde(flatten)]
    pub body: ResponseBody,
}

/// The payload half of a [`JobResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// The job produced a result.
    Success {
        /// Recognized text.
        text: String,
        /// MIME type the payload was processed as.
        mime_type: String,
    },
    /// The job failed; `error` identifies the failure class.
    Error {
        /// Error identifier or description.
        error: String,
    },
}

impl JobResponse {
    /// Creates a success response.
    pub fn success(
        topic: impl Into<String>,
        text: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            body: ResponseBody::Success {
                text: text.into(),
                mime_type: mime_type.into(),
            },
        }
    }

    /// Creates an error response.
    pub fn error(topic: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            body: ResponseBody::Error {
                error: error.into(),
            },
        }
    }

    /// Returns `true` for error responses.
    pub fn is_error(&self) -> bool {
        matches!(self.body, ResponseBody::Error { .. })
    }

    /// The recognized text, for success responses.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Success { text, .. } => Some(text),
            ResponseBody::Error { .. } => None,
        }
    }

    /// The error identifier, for error responses.
    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Error { error } => Some(error),
            ResponseBody::Success { .. } => None,
        }
    }

    /// Renders the response as the flat JSON mapping sent over the bus.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("topic".into(), Value::String(self.topic.clone()));
        match &self.body {
            ResponseBody::Success { text, mime_type } => {
                map.insert("text".into(), Value::String(text.clone()));
                map.insert("mime_type".into(), Value::String(mime_type.clone()));
            }
            ResponseBody::Error { error } => {
                map.insert("error".into(), Value::String(error.clone()));
            }
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_content_addressed() {
        let a = Job::new("t", b"hello".to_vec());
        let b = Job::new("other-topic", b"hello".to_vec());
        let c = Job::new("t", b"hello!".to_vec());

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        // Known SHA-1 of "hello".
        assert_eq!(a.fingerprint(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn success_response_serializes_flat() {
        let resp = JobResponse::success("File/Upload", "abc123", "image/png");
        assert_eq!(
            resp.to_value(),
            serde_json::json!({
                "topic": "File/Upload",
                "text": "abc123",
                "mime_type": "image/png",
            })
        );
        assert!(!resp.is_error());
        assert_eq!(resp.text(), Some("abc123"));
    }

    #[test]
    fn error_response_serializes_flat() {
        let resp = JobResponse::error("File/Upload", "timeout");
        assert_eq!(
            resp.to_value(),
            serde_json::json!({"topic": "File/Upload", "error": "timeout"})
        );
        assert!(resp.is_error());
        assert_eq!(resp.error_message(), Some("timeout"));
    }

    #[test]
    fn serde_matches_hand_rolled_mapping() {
        let resp = JobResponse::success("t", "x", "image/gif");
        let via_serde = serde_json::to_value(&resp).unwrap();
        assert_eq!(via_serde, resp.to_value());
    }
}
