use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use tickwatch_core::types::{SubscriberId, Ticker};

use crate::error::{Result, SubsError};

/// Minimum accepted notification interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// One registered recurring notification job.
///
/// Pure data plus a cancellation signal — the loop itself lives in the
/// runner task. Owned exclusively by the registry entry that created it; the
/// running task holds a clone of the token only. A job is never reused: a
/// new subscribe always constructs a fresh one.
#[derive(Debug)]
pub struct SubscriptionJob {
    subscriber: SubscriberId,
    ticker: Ticker,
    interval: Duration,
    created_at: DateTime<Utc>,
    id: Uuid,
    token: CancellationToken,
}

impl SubscriptionJob {
    /// Construct a job, validating the interval.
    pub(crate) fn new(
        subscriber: SubscriberId,
        ticker: Ticker,
        interval: Duration,
    ) -> Result<Self> {
        if interval < MIN_INTERVAL {
            return Err(SubsError::InvalidInterval(interval));
        }
        Ok(Self {
            subscriber,
            ticker,
            interval,
            created_at: Utc::now(),
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
        })
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Public snapshot of this job for callers of the registry.
    pub fn handle(&self) -> JobHandle {
        JobHandle {
            subscriber: self.subscriber,
            ticker: self.ticker.clone(),
            interval: self.interval,
            created_at: self.created_at,
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Signal cancellation. Idempotent — cancelling an already-finished or
    /// already-cancelled job is a no-op.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }
}

/// Read-only view of a registered job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub subscriber: SubscriberId,
    pub ticker: Ticker,
    pub interval: Duration,
    pub created_at: DateTime<Utc>,
}
