//! Telegram channel adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event
//! loop until the process exits. Long polling — no public URL required.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;

use tickwatch_core::config::TelegramConfig;
use tickwatch_subs::SubscriptionRegistry;

use crate::commands::Command;
use crate::handler::handle_command;

pub struct TelegramAdapter {
    bot: Bot,
    config: TelegramConfig,
    registry: Arc<SubscriptionRegistry>,
}

impl TelegramAdapter {
    pub fn new(bot: Bot, config: TelegramConfig, registry: Arc<SubscriptionRegistry>) -> Self {
        Self {
            bot,
            config,
            registry,
        }
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Never returns — runs for the lifetime of the process.
    pub async fn run(self) {
        info!("Telegram: starting long-polling dispatcher");

        let handler = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(handle_command);

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.registry, self.config])
            .default_handler(|_upd| async {})
            .build()
            .dispatch()
            .await;
    }
}
