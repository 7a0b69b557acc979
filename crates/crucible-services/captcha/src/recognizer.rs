//! External recognition capability.
//!
//! The OCR/vision provider itself is an external collaborator: latency-
//! variable, fallible, rate-limited. That is exactly why the service wraps
//! every call in the admission gate and retry executor. This module only
//! defines the seam; concrete providers (and test mocks) implement
//! [`Recognizer`].

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Error reported by a recognition provider.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RecognizerError(String);

impl RecognizerError {
    /// Creates a provider error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A provider that extracts text from an image.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognizes the text in the image encoded as `data_url`.
    ///
    /// Implementations may block for a long time and may fail transiently;
    /// callers are responsible for timeouts and retries.
    async fn recognize(&self, data_url: &str, mime: &str) -> Result<String, RecognizerError>;
}

/// Encodes image bytes as a `data:` URL for provider APIs.
pub fn to_data_url(image: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(image))
}
