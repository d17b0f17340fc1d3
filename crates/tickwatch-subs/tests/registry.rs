//! Behavioural tests for the subscription registry and its job loops,
//! driven with scripted sources and channel-recording notifiers.
//!
//! All multi-cycle tests run with a paused Tokio clock, so sleeps advance
//! deterministically and the suite finishes in milliseconds of wall time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio::time::timeout;

use tickwatch_core::types::{SubscriberId, Ticker};
use tickwatch_subs::{
    CancelOutcome, Notifier, SubsError, SubscriptionRegistry, ValueSource,
};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Pops scripted outcomes per fetch; falls back to `default` when exhausted.
struct ScriptedSource {
    script: Mutex<VecDeque<Option<f64>>>,
    default: Option<f64>,
}

impl ScriptedSource {
    fn repeating(value: Option<f64>) -> Arc<Self> {
        Self::sequence(vec![], value)
    }

    fn sequence(steps: Vec<Option<f64>>, default: Option<f64>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            default,
        })
    }
}

#[async_trait]
impl ValueSource for ScriptedSource {
    fn label(&self) -> &str {
        "TESTNET"
    }

    async fn fetch(&self, _ticker: &Ticker) -> Option<f64> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default)
    }
}

/// Records every delivery on an unbounded channel.
struct ChannelNotifier {
    tx: mpsc::UnboundedSender<(SubscriberId, String)>,
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, subscriber: SubscriberId, text: &str) {
        let _ = self.tx.send((subscriber, text.to_string()));
    }
}

/// Like [`ChannelNotifier`], but each delivery waits for one `notify_one`
/// permit first — lets a test hold a job inside its notify call.
struct GatedNotifier {
    gate: Arc<Notify>,
    tx: mpsc::UnboundedSender<(SubscriberId, String)>,
}

#[async_trait]
impl Notifier for GatedNotifier {
    async fn notify(&self, subscriber: SubscriberId, text: &str) {
        self.gate.notified().await;
        let _ = self.tx.send((subscriber, text.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup(
    source: Arc<dyn ValueSource>,
) -> (
    Arc<SubscriptionRegistry>,
    mpsc::UnboundedReceiver<(SubscriberId, String)>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let registry = SubscriptionRegistry::new(source, Arc::new(ChannelNotifier { tx }));
    (registry, rx)
}

fn ticker(s: &str) -> Ticker {
    Ticker::parse(s).unwrap()
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<(SubscriberId, String)>) -> (SubscriberId, String) {
    // Longer than any interval used in this suite: with a paused clock the
    // auto-advance must reach the job's own timer first.
    timeout(Duration::from_secs(3600), rx.recv())
        .await
        .expect("timed out waiting for a notification")
        .expect("notifier channel closed")
}

/// Asserts nothing arrives for 300 ms (well below every test interval).
async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<(SubscriberId, String)>) {
    let res = timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(res.is_err(), "unexpected notification: {:?}", res.unwrap());
}

/// Waits for the finished job's asynchronous self-removal to land.
async fn wait_until_empty(registry: &SubscriptionRegistry, subscriber: SubscriberId) {
    for _ in 0..100 {
        if registry.list(subscriber).is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("registry entry was never removed");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn first_miss_sends_exactly_one_terminal_message() {
    let (registry, mut rx) = setup(ScriptedSource::repeating(None));
    let sub = SubscriberId(1);

    registry
        .subscribe(sub, ticker("sol"), Duration::from_secs(60))
        .unwrap();

    let (to, text) = recv(&mut rx).await;
    assert_eq!(to, sub);
    assert_eq!(
        text,
        "Could not find pair SOLUSDT on TESTNET. Stopping notifications for SOL."
    );

    wait_until_empty(&registry, sub).await;
    assert_silent(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn prices_flow_until_ticker_disappears() {
    let source = ScriptedSource::sequence(vec![Some(142.5), Some(143.0), None], None);
    let (registry, mut rx) = setup(source);
    let sub = SubscriberId(1);

    registry
        .subscribe(sub, ticker("sol"), Duration::from_secs(60))
        .unwrap();

    let (_, first) = recv(&mut rx).await;
    assert_eq!(first, "SOL (SOLUSDT) = $142.5 USDT (TESTNET)");

    let (_, second) = recv(&mut rx).await;
    assert_eq!(second, "SOL (SOLUSDT) = $143 USDT (TESTNET)");

    let (_, last) = recv(&mut rx).await;
    assert!(last.contains("Stopping notifications for SOL"), "{last}");

    wait_until_empty(&registry, sub).await;
    assert_silent(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn resubscribe_replaces_the_previous_job() {
    let (registry, mut rx) = setup(ScriptedSource::repeating(Some(1.0)));
    let sub = SubscriberId(7);

    let first = registry
        .subscribe(sub, ticker("btc"), Duration::from_secs(600))
        .unwrap();
    assert_eq!(first.ticker.as_str(), "BTC");
    recv(&mut rx).await; // first job's initial price

    // Same key, case-insensitive — cancels the first job before installing.
    registry
        .subscribe(sub, ticker("BTC"), Duration::from_secs(600))
        .unwrap();
    recv(&mut rx).await; // second job's initial price

    assert_eq!(registry.list(sub), vec![ticker("btc")]);
    assert_eq!(registry.active_count(sub), 1);

    // The replaced job's 600 s sleep never produces another message.
    assert_silent(&mut rx).await;

    assert_eq!(registry.cancel(sub, &ticker("btc")), CancelOutcome::Stopped);
    assert_silent(&mut rx).await;
}

#[tokio::test]
async fn cancel_on_unknown_key_is_not_found() {
    let (registry, _rx) = setup(ScriptedSource::repeating(Some(1.0)));
    let sub = SubscriberId(42);

    assert_eq!(registry.cancel(sub, &ticker("btc")), CancelOutcome::NotFound);
    assert_eq!(registry.cancel_all(sub), 0);
    assert!(registry.list(sub).is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_sleep_sends_nothing_further() {
    let (registry, mut rx) = setup(ScriptedSource::repeating(Some(5.0)));
    let sub = SubscriberId(3);

    registry
        .subscribe(sub, ticker("eth"), Duration::from_secs(600))
        .unwrap();
    recv(&mut rx).await; // initial price, job now sleeping

    assert_eq!(registry.cancel(sub, &ticker("eth")), CancelOutcome::Stopped);
    // Removal is synchronous with the cancel call.
    assert!(registry.list(sub).is_empty());

    // The 600 s interval has not elapsed; silence proves the sleep was
    // interrupted rather than run to completion.
    assert_silent(&mut rx).await;
}

#[tokio::test(start_paused = true)]
async fn cancel_all_reports_count_and_silences_all_topics() {
    let (registry, mut rx) = setup(ScriptedSource::repeating(Some(2.0)));
    let sub = SubscriberId(2);

    registry
        .subscribe(sub, ticker("btc"), Duration::from_secs(60))
        .unwrap();
    recv(&mut rx).await;
    registry
        .subscribe(sub, ticker("eth"), Duration::from_secs(60))
        .unwrap();
    recv(&mut rx).await;

    assert_eq!(registry.list(sub), vec![ticker("btc"), ticker("eth")]);

    assert_eq!(registry.cancel_all(sub), 2);
    assert!(registry.list(sub).is_empty());
    assert_silent(&mut rx).await;

    assert_eq!(registry.cancel_all(sub), 0);
}

#[tokio::test]
async fn sub_minimum_interval_is_rejected_synchronously() {
    let (registry, mut rx) = setup(ScriptedSource::repeating(Some(1.0)));
    let sub = SubscriberId(9);

    let err = registry
        .subscribe(sub, ticker("btc"), Duration::from_millis(500))
        .unwrap_err();
    assert!(matches!(err, SubsError::InvalidInterval(_)));
    assert!(registry.list(sub).is_empty());

    let res = timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(res.is_err(), "rejected subscribe must not notify");
}

#[tokio::test(start_paused = true)]
async fn price_precision_is_preserved() {
    let (registry, mut rx) = setup(ScriptedSource::repeating(Some(67123.456789)));
    let sub = SubscriberId(5);

    registry
        .subscribe(sub, ticker("btc"), Duration::from_secs(600))
        .unwrap();

    let (_, text) = recv(&mut rx).await;
    assert_eq!(text, "BTC (BTCUSDT) = $67123.456789 USDT (TESTNET)");
}

#[tokio::test(start_paused = true)]
async fn jobs_of_different_subscribers_are_independent() {
    let (registry, mut rx) = setup(ScriptedSource::repeating(Some(1.5)));
    let alice = SubscriberId(100);
    let bob = SubscriberId(200);

    registry
        .subscribe(alice, ticker("btc"), Duration::from_secs(600))
        .unwrap();
    recv(&mut rx).await;
    registry
        .subscribe(bob, ticker("btc"), Duration::from_secs(600))
        .unwrap();
    let (to, _) = recv(&mut rx).await;
    assert_eq!(to, bob);

    assert_eq!(registry.cancel_all(alice), 1);
    assert_eq!(registry.list(bob), vec![ticker("btc")]);
    assert_eq!(registry.active_count(alice), 0);
}

/// A job that finishes after its key was re-subscribed must not remove the
/// replacement's registry entry.
#[tokio::test(start_paused = true)]
async fn finished_job_never_touches_its_replacement() {
    let gate = Arc::new(Notify::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let notifier = Arc::new(GatedNotifier {
        gate: Arc::clone(&gate),
        tx,
    });
    let registry = SubscriptionRegistry::new(ScriptedSource::repeating(None), notifier);
    let sub = SubscriberId(11);

    registry
        .subscribe(sub, ticker("btc"), Duration::from_secs(60))
        .unwrap();
    // Let the first job fetch its miss and park inside notify().
    tokio::time::sleep(Duration::from_millis(10)).await;

    registry
        .subscribe(sub, ticker("btc"), Duration::from_secs(60))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Release the first job: it sends its terminal message and tries to
    // remove its entry — which now belongs to the second job.
    gate.notify_one();
    recv(&mut rx).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(registry.list(sub), vec![ticker("btc")]);

    // Release the second job; its own finish removes the entry for real.
    gate.notify_one();
    recv(&mut rx).await;
    wait_until_empty(&registry, sub).await;
}
