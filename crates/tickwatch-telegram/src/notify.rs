//! Outbound delivery of job notifications via the Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::warn;

use tickwatch_core::types::SubscriberId;
use tickwatch_subs::Notifier;

/// Best-effort [`Notifier`] over a teloxide `Bot`.
///
/// Delivery failures are logged and swallowed — a flaky Telegram call must
/// not end the price job that triggered it.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, subscriber: SubscriberId, text: &str) {
        if let Err(e) = self.bot.send_message(ChatId(subscriber.0), text).await {
            warn!(subscriber = %subscriber, error = %e, "notification delivery failed");
        }
    }
}
