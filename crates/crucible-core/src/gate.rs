//! Admission gate bounding concurrent execution of expensive external calls.
//!
//! One configurable policy covers the strategies that grew side by side in
//! earlier iterations of the captcha service (semaphore + pool, global
//! exclusive lock, global lock with a rate floor):
//!
//! - a concurrency bound `C` (`C == 1` is the fully exclusive case);
//! - an optional minimum spacing `S` between a ticket release and the next
//!   grant, independent of exclusivity.
//!
//! All state is owned by one [`AdmissionGate`] instance, constructed per
//! service — there are no globals, so two services never interfere and the
//! policy is testable in isolation.
//!
//! Timing uses [`tokio::time`], so tests can pause the clock.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tracing::trace;

use crate::error::{GateError, GateResult};

// =============================================================================
// Policy
// =============================================================================

/// Admission policy: concurrency bound plus optional spacing floor.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    /// Maximum number of tickets outstanding at once. `1` means fully
    /// exclusive. Values below 1 are clamped to 1.
    pub max_concurrency: usize,
    /// Minimum gap between a ticket release and the next grant.
    /// [`Duration::ZERO`] disables the spacing floor.
    pub min_interval: Duration,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            max_concurrency: 2,
            min_interval: Duration::ZERO,
        }
    }
}

impl GatePolicy {
    /// Creates a policy with the given concurrency bound and no spacing.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency,
            min_interval: Duration::ZERO,
        }
    }

    /// Creates a fully exclusive policy (one in-flight call system-wide).
    pub fn exclusive() -> Self {
        Self::new(1)
    }

    /// Sets the minimum spacing between a release and the next grant.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }
}

// =============================================================================
// Gate
// =============================================================================

struct GateShared {
    slots: Arc<Semaphore>,
    min_interval: Duration,
    /// Instant of the most recent ticket release; `None` until the first.
    last_release: Mutex<Option<Instant>>,
}

/// Bounds how many expensive calls run concurrently.
///
/// Cloning is cheap and clones share the same slots and spacing state.
#[derive(Clone)]
pub struct AdmissionGate {
    shared: Arc<GateShared>,
}

impl AdmissionGate {
    /// Creates a gate enforcing `policy`.
    pub fn new(policy: GatePolicy) -> Self {
        let max_concurrency = policy.max_concurrency.max(1);
        Self {
            shared: Arc::new(GateShared {
                slots: Arc::new(Semaphore::new(max_concurrency)),
                min_interval: policy.min_interval,
                last_release: Mutex::new(None),
            }),
        }
    }

    /// Acquires an admission ticket, waiting at most `timeout`.
    ///
    /// The caller blocks on the semaphore (no busy-spin) until a slot frees.
    /// With a spacing floor configured, a freshly freed slot is not granted
    /// until `min_interval` has elapsed since the most recent release; that
    /// remainder is slept **without** holding the slot, so other callers are
    /// not starved by the wait.
    ///
    /// Exceeding `timeout` returns [`GateError::AcquireTimeout`] and leaves
    /// no side effects.
    pub async fn acquire(&self, timeout: Duration) -> GateResult<AdmissionTicket> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(GateError::AcquireTimeout { waited: timeout });
            }

            let permit = tokio::time::timeout(
                remaining,
                Arc::clone(&self.shared.slots).acquire_owned(),
            )
            .await
            .map_err(|_| GateError::AcquireTimeout { waited: timeout })?
            .map_err(|_| GateError::Closed)?;

            let spacing_wait = self.spacing_wait();
            if spacing_wait.is_zero() {
                trace!("admission ticket granted");
                return Ok(AdmissionTicket {
                    shared: Arc::clone(&self.shared),
                    permit: Some(permit),
                });
            }

            // The spacing window must be waited out while holding no slot.
            drop(permit);
            if Instant::now() + spacing_wait > deadline {
                return Err(GateError::AcquireTimeout { waited: timeout });
            }
            trace!(wait = ?spacing_wait, "waiting out admission spacing window");
            tokio::time::sleep(spacing_wait).await;
        }
    }

    /// Number of slots currently free.
    pub fn available_slots(&self) -> usize {
        self.shared.slots.available_permits()
    }

    /// Remaining spacing window, zero when a grant is allowed now.
    fn spacing_wait(&self) -> Duration {
        if self.shared.min_interval.is_zero() {
            return Duration::ZERO;
        }
        let last_release = self.shared.last_release.lock();
        match *last_release {
            Some(released_at) => {
                (released_at + self.shared.min_interval).saturating_duration_since(Instant::now())
            }
            None => Duration::ZERO,
        }
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// Proof of one granted execution slot.
///
/// Dropping the ticket releases the slot and records the release instant for
/// the spacing floor. Release happens on every exit path — success, failure
/// or panic — and at most once.
pub struct AdmissionTicket {
    shared: Arc<GateShared>,
    permit: Option<OwnedSemaphorePermit>,
}

impl Drop for AdmissionTicket {
    fn drop(&mut self) {
        // Record the release before freeing the slot so the next grant
        // observes the spacing window.
        *self.shared.last_release.lock() = Some(Instant::now());
        drop(self.permit.take());
        trace!("admission ticket released");
    }
}
