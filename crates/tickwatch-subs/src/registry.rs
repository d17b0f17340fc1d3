//! Concurrency-safe store of active subscription jobs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use tickwatch_core::types::{SubscriberId, Ticker};

use crate::error::Result;
use crate::job::{JobHandle, SubscriptionJob};
use crate::runner::{self, JobContext};
use crate::traits::{Notifier, ValueSource};

/// Outcome of a [`SubscriptionRegistry::cancel`] call.
///
/// Cancelling a key with no active job is not an error — the caller just
/// learns nothing was there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// A job was cancelled and its entry removed.
    Stopped,
    /// No job was registered for the (subscriber, ticker) key.
    NotFound,
}

/// Authoritative record of which jobs are currently active.
///
/// Maps subscriber → ticker → job. All operations take a single mutex for
/// map bookkeeping only — the lock is never held across a job's fetch,
/// notify or sleep, so one subscriber's work can never block another's
/// subscribe/cancel calls.
pub struct SubscriptionRegistry {
    subs: Mutex<HashMap<SubscriberId, HashMap<Ticker, SubscriptionJob>>>,
    source: Arc<dyn ValueSource>,
    notifier: Arc<dyn Notifier>,
}

impl SubscriptionRegistry {
    /// Create a registry bound to its two collaborators.
    ///
    /// Returned as `Arc<Self>` because each spawned job task keeps a weak
    /// reference back to the registry for self-removal when its ticker
    /// disappears from the source.
    pub fn new(source: Arc<dyn ValueSource>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Arc::new(Self {
            subs: Mutex::new(HashMap::new()),
            source,
            notifier,
        })
    }

    /// Register a recurring notification job for (subscriber, ticker).
    ///
    /// Any existing job for the key is cancelled before the new one is
    /// installed, under the same lock acquisition — at most one job is ever
    /// registered per key. The job's loop runs on a freshly spawned task;
    /// this call never waits for it.
    pub fn subscribe(
        self: &Arc<Self>,
        subscriber: SubscriberId,
        ticker: Ticker,
        interval: Duration,
    ) -> Result<JobHandle> {
        let job = SubscriptionJob::new(subscriber, ticker.clone(), interval)?;
        let handle = job.handle();
        let ctx = JobContext {
            subscriber,
            ticker: ticker.clone(),
            interval,
            job_id: job.id(),
            token: job.token(),
            source: Arc::clone(&self.source),
            notifier: Arc::clone(&self.notifier),
            registry: Arc::downgrade(self),
        };

        {
            let mut subs = self.subs.lock().unwrap();
            let per_user = subs.entry(subscriber).or_default();
            if let Some(old) = per_user.remove(&ticker) {
                old.cancel();
                debug!(subscriber = %subscriber, ticker = %ticker, "replacing existing job");
            }
            per_user.insert(ticker.clone(), job);
        }

        tokio::spawn(runner::run(ctx));
        info!(
            subscriber = %subscriber,
            ticker = %ticker,
            interval_secs = interval.as_secs(),
            "subscription started"
        );
        Ok(handle)
    }

    /// Cancel the job for one (subscriber, ticker) key.
    ///
    /// The registry entry is removed synchronously; the job task exits at its
    /// next cancellation check without sending anything further. Does not
    /// wait for the task to unwind.
    pub fn cancel(&self, subscriber: SubscriberId, ticker: &Ticker) -> CancelOutcome {
        let mut subs = self.subs.lock().unwrap();
        let Some(per_user) = subs.get_mut(&subscriber) else {
            return CancelOutcome::NotFound;
        };
        match per_user.remove(ticker) {
            Some(job) => {
                job.cancel();
                if per_user.is_empty() {
                    subs.remove(&subscriber);
                }
                info!(subscriber = %subscriber, ticker = %ticker, "subscription cancelled");
                CancelOutcome::Stopped
            }
            None => CancelOutcome::NotFound,
        }
    }

    /// Cancel every job for a subscriber. Returns how many were active.
    pub fn cancel_all(&self, subscriber: SubscriberId) -> usize {
        let removed = {
            let mut subs = self.subs.lock().unwrap();
            subs.remove(&subscriber)
        };
        match removed {
            Some(per_user) => {
                let count = per_user.len();
                for job in per_user.values() {
                    job.cancel();
                }
                info!(subscriber = %subscriber, count, "all subscriptions cancelled");
                count
            }
            None => 0,
        }
    }

    /// Snapshot of the registered tickers for a subscriber, sorted.
    pub fn list(&self, subscriber: SubscriberId) -> Vec<Ticker> {
        self.entries(subscriber)
            .into_iter()
            .map(|h| h.ticker)
            .collect()
    }

    /// Snapshot of the registered jobs for a subscriber, sorted by ticker.
    pub fn entries(&self, subscriber: SubscriberId) -> Vec<JobHandle> {
        let subs = self.subs.lock().unwrap();
        let mut entries: Vec<JobHandle> = subs
            .get(&subscriber)
            .map(|per_user| per_user.values().map(SubscriptionJob::handle).collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        entries
    }

    /// Number of active jobs for a subscriber.
    pub fn active_count(&self, subscriber: SubscriberId) -> usize {
        let subs = self.subs.lock().unwrap();
        subs.get(&subscriber).map(HashMap::len).unwrap_or(0)
    }

    /// Remove a job entry after its loop finished on its own (ticker gone
    /// from the source).
    ///
    /// Guarded by the job's ID: if the key has already been re-subscribed,
    /// the entry belongs to a different job and is left untouched.
    pub(crate) fn remove_finished(
        &self,
        subscriber: SubscriberId,
        ticker: &Ticker,
        job_id: Uuid,
    ) {
        let mut subs = self.subs.lock().unwrap();
        let Some(per_user) = subs.get_mut(&subscriber) else {
            return;
        };
        if per_user.get(ticker).is_some_and(|job| job.id() == job_id) {
            per_user.remove(ticker);
            if per_user.is_empty() {
                subs.remove(&subscriber);
            }
            debug!(subscriber = %subscriber, ticker = %ticker, "finished job removed");
        }
    }
}
