//! Collaborator interfaces the scheduler core is written against.

use async_trait::async_trait;

use tickwatch_core::types::{SubscriberId, Ticker};

/// Source of the polled value (e.g. an exchange REST API).
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// by every job task.
#[async_trait]
pub trait ValueSource: Send + Sync {
    /// Short venue label shown in notifications (e.g. `"MEXC"`).
    fn label(&self) -> &str;

    /// Current price for the ticker's trading pair.
    ///
    /// Returns `None` when the pair does not exist — and also for every
    /// transient failure (network error, non-200 status, bad payload). The
    /// scheduler cannot tell those apart and treats any `None` as terminal
    /// for the job.
    async fn fetch(&self, ticker: &Ticker) -> Option<f64>;
}

/// Outbound message delivery (e.g. a Telegram bot).
///
/// Delivery is best-effort: implementations log failures and never surface
/// them to the scheduler.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subscriber: SubscriberId, text: &str);
}
