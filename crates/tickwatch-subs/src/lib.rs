//! `tickwatch-subs` — the subscription scheduler.
//!
//! # Overview
//!
//! The [`SubscriptionRegistry`] owns one recurring notification job per
//! (subscriber, ticker) pair. Each job is an independent Tokio task driving a
//! fetch → notify → sleep loop against two collaborators supplied at
//! construction time:
//!
//! - [`ValueSource`] — fetches the current price for a ticker; every failure
//!   mode collapses into `None`.
//! - [`Notifier`] — delivers a text message to a subscriber, best-effort.
//!
//! # Lifecycle
//!
//! ```text
//! subscribe(u, t, interval) ──► registry entry + spawned job task
//!
//! loop {
//!   ├─► fetch(t)  (bounded by a 10 s timeout)
//!   │     ├─ None    ─► notify "stopping", remove own entry, exit (Finished)
//!   │     └─ Some(p) ─► notify price
//!   └─► sleep(interval), interruptible
//!         └─ cancelled ─► exit silently (Cancelled)
//! }
//! ```
//!
//! Re-subscribing the same (subscriber, ticker) cancels the previous job
//! under the same lock acquisition that installs the new one, so at most one
//! job is ever registered for a key. `cancel`/`cancel_all` remove entries
//! synchronously; the unwinding task observes its cancellation token at the
//! next check and exits without sending anything further.

pub mod error;
pub mod job;
pub mod registry;
mod runner;
pub mod traits;

pub use error::{Result, SubsError};
pub use job::{JobHandle, MIN_INTERVAL};
pub use registry::{CancelOutcome, SubscriptionRegistry};
pub use traits::{Notifier, ValueSource};
