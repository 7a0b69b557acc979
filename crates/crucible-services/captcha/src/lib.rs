//! Crucible Captcha - image recognition job service.
//!
//! Wraps an external OCR/vision provider behind the host's service seam:
//! inbound jobs are validated, deduplicated by content fingerprint,
//! admitted through a concurrency gate with an optional spacing floor, and
//! the provider call itself is retried with exponential backoff under a
//! per-attempt timeout.
//!
//! Register [`CaptchaFactory`] with the host's service registry under the
//! `"captcha"` key to make the service loadable from a manifest.

pub mod config;
pub mod error;
pub mod mime;
pub mod recognizer;
pub mod service;

// Re-exports
pub use config::CaptchaConfig;
pub use error::CaptchaError;
pub use mime::{DEFAULT_MIME, resolve_mime};
pub use recognizer::{Recognizer, RecognizerError, to_data_url};
pub use service::{CaptchaFactory, CaptchaService, Recognition, SERVICE_TYPE};
