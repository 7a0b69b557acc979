//! Captcha service error taxonomy.

use thiserror::Error;

use crucible_core::{GateError, RetryError};

/// Failure modes of one captcha job.
///
/// None of these ever escape [`handle`]; they are converted into the
/// structured error response at the service boundary.
///
/// [`handle`]: crucible_core::JobService::handle
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// The job carried no payload bytes. Never retried.
    #[error("missing image content")]
    EmptyPayload,

    /// The payload resolved to a non-image MIME type. Never retried.
    #[error("unsupported mime type: {0}")]
    UnsupportedMime(String),

    /// The admission wait exceeded its ceiling.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// All recognition attempts were exhausted.
    #[error(transparent)]
    Retry(#[from] RetryError),
}

impl CaptchaError {
    /// The error identifier placed in the job response.
    ///
    /// Timeout-classed failures — the admission wait expiring, or every
    /// attempt dying on its timeout — collapse to the distinguished
    /// `"timeout"` identifier; validation and transient failures keep
    /// their own descriptions.
    pub fn response_message(&self) -> String {
        match self {
            Self::Gate(GateError::AcquireTimeout { .. }) => "timeout".to_string(),
            Self::Retry(err) if err.timed_out() => "timeout".to_string(),
            other => other.to_string(),
        }
    }
}
