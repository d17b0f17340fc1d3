use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use teloxide::Bot;
use tracing::{info, warn};

use tickwatch_core::config::AppConfig;
use tickwatch_mexc::MexcSource;
use tickwatch_subs::SubscriptionRegistry;
use tickwatch_telegram::{TelegramAdapter, TelegramNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickwatch_bot=info,tickwatch_subs=info".into()),
        )
        .init();

    // load config: explicit path via TICKWATCH_CONFIG > ~/.tickwatch/tickwatch.toml
    let config_path = std::env::var("TICKWATCH_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    // bot token: config file wins, BOT_TOKEN env var is the fallback
    let bot_token = if config.telegram.bot_token.is_empty() {
        std::env::var("BOT_TOKEN").unwrap_or_default()
    } else {
        config.telegram.bot_token.clone()
    };
    if bot_token.is_empty() {
        bail!("no bot token: set telegram.bot_token in tickwatch.toml or the BOT_TOKEN env var");
    }

    let source = Arc::new(MexcSource::new(
        &config.source.base_url,
        Duration::from_secs(config.source.timeout_secs),
    )?);
    info!(base_url = %config.source.base_url, "price source ready");

    let bot = Bot::new(bot_token);
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let registry = SubscriptionRegistry::new(source, notifier);

    let adapter = TelegramAdapter::new(bot, config.telegram.clone(), registry);
    adapter.run().await;

    Ok(())
}
