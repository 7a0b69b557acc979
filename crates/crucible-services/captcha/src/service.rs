//! The captcha recognition service.
//!
//! Per-job pipeline: validate payload and MIME type, fingerprint, dedup
//! cache lookup, admission gate, retried provider call, cache store. A
//! cache hit bypasses admission entirely — replaying a known answer costs
//! nothing and should not be throttled. The admission ticket is held across
//! one job's own retries (serializing them against other jobs) and released
//! on every exit path by RAII.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::CaptchaConfig;
use crate::error::CaptchaError;
use crate::mime::resolve_mime;
use crate::recognizer::{Recognizer, to_data_url};
use crucible_core::{
    AdmissionGate, AttemptError, BoxedService, DedupCache, Job, JobResponse, JobService,
    RetryError, RetryPolicy, ServiceError, ServiceFactory, ServiceResult, run_with_retry,
};

/// Registry key of the captcha service.
pub const SERVICE_TYPE: &str = "captcha";

/// A successfully recognized payload, as stored in the dedup cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Recognized text, trimmed.
    pub text: String,
    /// MIME type the payload was processed as.
    pub mime_type: String,
}

/// Image-recognition job service.
pub struct CaptchaService {
    name: String,
    recognizer: Arc<dyn Recognizer>,
    gate: AdmissionGate,
    cache: DedupCache<Recognition>,
    retry: RetryPolicy,
    admission_timeout: Duration,
}

impl CaptchaService {
    /// Builds the service from its validated configuration.
    pub fn new(
        name: impl Into<String>,
        config: &CaptchaConfig,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        let name = name.into();
        if config.max_workers.is_some() {
            warn!(
                service = %name,
                "max_workers is ignored, the async runtime schedules workers"
            );
        }
        info!(
            service = %name,
            max_concurrency = config.max_concurrency,
            max_retries = config.max_retries,
            "captcha service initialized"
        );
        Self {
            name,
            recognizer,
            gate: AdmissionGate::new(config.gate_policy()),
            cache: DedupCache::new(config.dedup_capacity, config.dedup_ttl()),
            retry: config.retry_policy(),
            admission_timeout: config.admission_timeout(),
        }
    }

    async fn process(&self, job: &Job) -> Result<Recognition, CaptchaError> {
        if job.payload.is_empty() {
            return Err(CaptchaError::EmptyPayload);
        }
        let mime = resolve_mime(
            job.mime_type.as_deref(),
            job.filename.as_deref(),
            &job.payload,
        )?;

        let key = job.fingerprint();
        if let Some(hit) = self.cache.get(&key) {
            debug!(service = %self.name, fingerprint = %key, "dedup cache hit");
            return Ok(hit);
        }

        let ticket = self.gate.acquire(self.admission_timeout).await?;
        let outcome = self.recognize_with_retry(&job.payload, &mime).await;
        drop(ticket);

        let text = outcome?;
        let recognition = Recognition {
            text,
            mime_type: mime,
        };
        self.cache.insert(key, recognition.clone());
        Ok(recognition)
    }

    async fn recognize_with_retry(
        &self,
        payload: &[u8],
        mime: &str,
    ) -> Result<String, RetryError> {
        let data_url: Arc<str> = to_data_url(payload, mime).into();
        let mime: Arc<str> = Arc::from(mime);
        let recognizer = Arc::clone(&self.recognizer);

        run_with_retry(&self.retry, move |_attempt| {
            let recognizer = Arc::clone(&recognizer);
            let data_url = Arc::clone(&data_url);
            let mime = Arc::clone(&mime);
            async move {
                let text = recognizer
                    .recognize(&data_url, &mime)
                    .await
                    .map_err(|err| AttemptError::Failed(err.to_string()))?;
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(AttemptError::Failed("empty recognition result".to_string()));
                }
                Ok(text)
            }
        })
        .await
    }
}

#[async_trait]
impl JobService for CaptchaService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, job: Job) -> JobResponse {
        let topic = job.topic.clone();
        match self.process(&job).await {
            Ok(recognition) => {
                JobResponse::success(topic, recognition.text, recognition.mime_type)
            }
            Err(err) => {
                warn!(service = %self.name, error = %err, "captcha job failed");
                JobResponse::error(topic, err.response_message())
            }
        }
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Registry factory building [`CaptchaService`] instances.
pub struct CaptchaFactory {
    recognizer: Arc<dyn Recognizer>,
}

impl CaptchaFactory {
    /// Creates a factory injecting the given recognition provider.
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self { recognizer }
    }
}

#[async_trait]
impl ServiceFactory for CaptchaFactory {
    fn service_type(&self) -> &'static str {
        SERVICE_TYPE
    }

    async fn build(&self, name: &str, config: &Value) -> ServiceResult<BoxedService> {
        let config: CaptchaConfig = if config.is_null() {
            CaptchaConfig::default()
        } else {
            serde_json::from_value(config.clone())
                .map_err(|err| ServiceError::InvalidConfig(err.to_string()))?
        };
        config.validate().map_err(ServiceError::InvalidConfig)?;
        Ok(Arc::new(CaptchaService::new(
            name,
            &config,
            Arc::clone(&self.recognizer),
        )))
    }
}
