//! Crucible Core - job model and admission/retry kernel.
//!
//! This crate holds everything a job service needs that is independent of
//! how services are discovered and configured:
//!
//! - [`Job`] / [`JobResponse`]: the units exchanged with the bus boundary
//! - [`JobService`] / [`ServiceFactory`]: the plugin seam
//! - [`DedupCache`]: time-bounded replay suppression
//! - [`AdmissionGate`]: configurable concurrency bound with spacing floor
//! - [`run_with_retry`]: bounded retry with exponential backoff
//!
//! The host orchestration (manifests, layered configuration, the service
//! registry) lives in `crucible-runtime`; concrete services such as the
//! captcha recognizer live under `crucible-services`.

pub mod cache;
pub mod error;
pub mod gate;
pub mod job;
pub mod retry;
pub mod service;

// Re-exports
pub use cache::DedupCache;
pub use error::{
    AttemptError, GateError, GateResult, RetryError, RetryResult, ServiceError, ServiceResult,
};
pub use gate::{AdmissionGate, AdmissionTicket, GatePolicy};
pub use job::{Job, JobResponse, ResponseBody, fingerprint};
pub use retry::{RetryPolicy, run_with_retry};
pub use service::{BoxedService, JobService, ServiceFactory};
