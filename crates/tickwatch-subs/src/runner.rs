//! The per-job fetch → notify → sleep loop.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use tickwatch_core::types::{SubscriberId, Ticker};

use crate::registry::SubscriptionRegistry;
use crate::traits::{Notifier, ValueSource};

/// Upper bound on a single source fetch. Expiry is folded into the same
/// "not found" outcome as any other fetch failure.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything one job task needs, captured at subscribe time.
pub(crate) struct JobContext {
    pub(crate) subscriber: SubscriberId,
    pub(crate) ticker: Ticker,
    pub(crate) interval: Duration,
    pub(crate) job_id: Uuid,
    pub(crate) token: CancellationToken,
    pub(crate) source: Arc<dyn ValueSource>,
    pub(crate) notifier: Arc<dyn Notifier>,
    /// Weak so an unwinding task never keeps the registry alive.
    pub(crate) registry: Weak<SubscriptionRegistry>,
}

/// Drive one job until it is cancelled or its ticker disappears from the
/// source.
///
/// Cancellation is cooperative: it is observed before each fetch and
/// interrupts the inter-cycle sleep. After cancellation is observed, nothing
/// further is sent. When the source reports the ticker gone, exactly one
/// terminal message is sent and the job removes its own registry entry
/// (guarded by job ID, so a replacement entry is never touched).
pub(crate) async fn run(ctx: JobContext) {
    loop {
        if ctx.token.is_cancelled() {
            debug!(subscriber = %ctx.subscriber, ticker = %ctx.ticker, "job cancelled");
            return;
        }

        let fetched = tokio::select! {
            _ = ctx.token.cancelled() => {
                debug!(subscriber = %ctx.subscriber, ticker = %ctx.ticker, "job cancelled during fetch");
                return;
            }
            res = timeout(FETCH_TIMEOUT, ctx.source.fetch(&ctx.ticker)) => {
                // Timer expiry (Err) collapses into None like any other failure.
                res.ok().flatten()
            }
        };

        match fetched {
            None => {
                let text = format!(
                    "Could not find pair {} on {}. Stopping notifications for {}.",
                    ctx.ticker.pair(),
                    ctx.source.label(),
                    ctx.ticker,
                );
                ctx.notifier.notify(ctx.subscriber, &text).await;
                if let Some(registry) = ctx.registry.upgrade() {
                    registry.remove_finished(ctx.subscriber, &ctx.ticker, ctx.job_id);
                }
                info!(
                    subscriber = %ctx.subscriber,
                    ticker = %ctx.ticker,
                    "ticker not found at source, job finished"
                );
                return;
            }
            Some(price) => {
                // f64 Display is shortest round-trip — full precision, no rounding.
                let text = format!(
                    "{} ({}) = ${} {} ({})",
                    ctx.ticker,
                    ctx.ticker.pair(),
                    price,
                    tickwatch_core::types::QUOTE_ASSET,
                    ctx.source.label(),
                );
                ctx.notifier.notify(ctx.subscriber, &text).await;
            }
        }

        tokio::select! {
            _ = ctx.token.cancelled() => {
                debug!(subscriber = %ctx.subscriber, ticker = %ctx.ticker, "job cancelled during sleep");
                return;
            }
            _ = sleep(ctx.interval) => {}
        }
    }
}
