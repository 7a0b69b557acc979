//! Unified error types for the Crucible core kernel.
//!
//! Host-level errors (manifest, configuration, registry) are defined in
//! crucible-runtime; this module only covers the admission and retry
//! machinery plus the service construction seam.

use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Admission Errors
// =============================================================================

/// Errors that can occur while acquiring an admission ticket.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    /// The admission wait exceeded the caller's timeout.
    ///
    /// No ticket was granted and no gate state was modified.
    #[error("admission wait exceeded {waited:?}")]
    AcquireTimeout {
        /// How long the caller was willing to wait.
        waited: Duration,
    },

    /// The gate has been closed and no further tickets will be granted.
    #[error("admission gate closed")]
    Closed,
}

// =============================================================================
// Retry Errors
// =============================================================================

/// A single failed attempt, as recorded by the retry executor.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    /// The attempt did not finish within the per-attempt timeout.
    #[error("attempt timed out after {timeout:?}")]
    Timeout {
        /// The per-attempt timeout that elapsed.
        timeout: Duration,
    },

    /// The attempt completed but reported a failure.
    #[error("{0}")]
    Failed(String),
}

/// All retry attempts were exhausted without a success.
///
/// Wraps the last observed [`AttemptError`]; earlier failures are only
/// visible through logging.
#[derive(Debug, Clone, Error)]
#[error("operation failed after {attempts} attempt(s): {last}")]
pub struct RetryError {
    /// Number of attempts that were made.
    pub attempts: u32,
    /// The failure observed on the final attempt.
    pub last: AttemptError,
}

impl RetryError {
    /// Returns `true` when the final attempt failed on its timeout rather
    /// than on a reported error.
    pub fn timed_out(&self) -> bool {
        matches!(self.last, AttemptError::Timeout { .. })
    }
}

// =============================================================================
// Service Errors
// =============================================================================

/// Errors produced while constructing a service from its merged config.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The merged configuration could not be deserialized or validated.
    #[error("invalid service configuration: {0}")]
    InvalidConfig(String),

    /// The service failed during initialization.
    #[error("service initialization failed: {0}")]
    Init(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for admission operations.
pub type GateResult<T> = Result<T, GateError>;

/// Result type for retried operations.
pub type RetryResult<T> = Result<T, RetryError>;

/// Result type for service construction.
pub type ServiceResult<T> = Result<T, ServiceError>;
