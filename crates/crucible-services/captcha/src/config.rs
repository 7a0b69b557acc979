//! Captcha service configuration.
//!
//! Deserialized from the merged configuration the loader hands to the
//! factory; unknown keys from other sections are ignored. Durations are
//! expressed in (fractional) seconds, matching the original option names
//! (`dedup_ttl_sec`, `request_timeout_sec`, ...).

use std::time::Duration;

use serde::Deserialize;

use crucible_core::{GatePolicy, RetryPolicy};

/// Tunables for the captcha service's dedup, admission and retry behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Maximum number of concurrent provider calls (1 = fully exclusive).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Seconds an identical payload is answered from the dedup cache.
    #[serde(default = "default_dedup_ttl_sec")]
    pub dedup_ttl_sec: f64,

    /// Maximum number of dedup cache entries.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,

    /// Hard per-attempt timeout on the provider call, in seconds.
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: f64,

    /// Total number of provider attempts, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff before the second attempt, in seconds.
    #[serde(default = "default_retry_backoff_sec")]
    pub retry_backoff_sec: f64,

    /// Exponential backoff multiplier.
    #[serde(default = "default_retry_multiplier")]
    pub retry_multiplier: f64,

    /// Ceiling on the admission wait, in seconds. When absent the ceiling
    /// is computed from the worst-case retry budget.
    #[serde(default)]
    pub lock_timeout_sec: Option<f64>,

    /// Minimum spacing between a provider call release and the next call
    /// start, in seconds. Zero disables the floor.
    #[serde(default)]
    pub min_interval_sec: f64,

    /// Legacy thread-pool size; accepted but ignored, the async runtime
    /// schedules the workers.
    #[serde(default)]
    pub max_workers: Option<usize>,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            dedup_ttl_sec: default_dedup_ttl_sec(),
            dedup_capacity: default_dedup_capacity(),
            request_timeout_sec: default_request_timeout_sec(),
            max_retries: default_max_retries(),
            retry_backoff_sec: default_retry_backoff_sec(),
            retry_multiplier: default_retry_multiplier(),
            lock_timeout_sec: None,
            min_interval_sec: 0.0,
            max_workers: None,
        }
    }
}

fn default_max_concurrency() -> usize {
    2
}

fn default_dedup_ttl_sec() -> f64 {
    60.0
}

fn default_dedup_capacity() -> usize {
    512
}

fn default_request_timeout_sec() -> f64 {
    20.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_sec() -> f64 {
    0.8
}

fn default_retry_multiplier() -> f64 {
    1.6
}

impl CaptchaConfig {
    /// Validates the configured values.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("dedup_ttl_sec", self.dedup_ttl_sec),
            ("request_timeout_sec", self.request_timeout_sec),
            ("retry_backoff_sec", self.retry_backoff_sec),
            ("min_interval_sec", self.min_interval_sec),
            ("lock_timeout_sec", self.lock_timeout_sec.unwrap_or(0.0)),
        ] {
            // try_from_secs_f64 rejects NaN, infinities, negatives and
            // values too large for a Duration in one check.
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(format!(
                    "{field} must be a non-negative number of seconds, got {value}"
                ));
            }
        }
        if !self.retry_multiplier.is_finite() || self.retry_multiplier < 1.0 {
            return Err(format!(
                "retry_multiplier must be >= 1.0, got {}",
                self.retry_multiplier
            ));
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be at least 1".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        Ok(())
    }

    /// TTL for the dedup cache.
    pub fn dedup_ttl(&self) -> Duration {
        Duration::from_secs_f64(self.dedup_ttl_sec)
    }

    /// Retry schedule for provider calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            base_delay: Duration::from_secs_f64(self.retry_backoff_sec),
            multiplier: self.retry_multiplier,
            attempt_timeout: Duration::from_secs_f64(self.request_timeout_sec),
        }
    }

    /// Admission policy for provider calls.
    pub fn gate_policy(&self) -> GatePolicy {
        GatePolicy::new(self.max_concurrency)
            .with_min_interval(Duration::from_secs_f64(self.min_interval_sec))
    }

    /// Ceiling on the admission wait: the configured lock timeout, or the
    /// worst-case budget of one fully exhausted retry run ahead in line.
    pub fn admission_timeout(&self) -> Duration {
        match self.lock_timeout_sec {
            Some(secs) => Duration::from_secs_f64(secs),
            None => self.retry_policy().worst_case(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let config = CaptchaConfig::default();
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.dedup_ttl(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_from_merged_config_ignoring_foreign_keys() {
        let merged = json!({
            "name": "captcha_service",
            "logging": {"level": "debug"},
            "max_concurrency": 1,
            "dedup_ttl_sec": 30,
            "max_retries": 5,
            "min_interval_sec": 1.5,
            "max_workers": 4,
        });
        let config: CaptchaConfig = serde_json::from_value(merged).unwrap();
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.dedup_ttl_sec, 30.0);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.min_interval_sec, 1.5);
        assert_eq!(config.max_workers, Some(4));
    }

    #[test]
    fn admission_timeout_defaults_to_worst_case_budget() {
        let config = CaptchaConfig {
            max_retries: 2,
            request_timeout_sec: 10.0,
            retry_backoff_sec: 1.0,
            retry_multiplier: 2.0,
            ..CaptchaConfig::default()
        };
        // Two 10s attempts plus one 1s backoff sleep.
        assert_eq!(config.admission_timeout(), Duration::from_secs(21));

        let config = CaptchaConfig {
            lock_timeout_sec: Some(3.0),
            ..config
        };
        assert_eq!(config.admission_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn rejects_nonsense_values() {
        let config = CaptchaConfig {
            request_timeout_sec: -1.0,
            ..CaptchaConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CaptchaConfig {
            max_concurrency: 0,
            ..CaptchaConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CaptchaConfig {
            retry_multiplier: 0.5,
            ..CaptchaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_durations_too_large_to_represent() {
        let config = CaptchaConfig {
            dedup_ttl_sec: 1e300,
            ..CaptchaConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CaptchaConfig {
            lock_timeout_sec: Some(1e300),
            ..CaptchaConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
