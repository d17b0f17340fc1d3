//! Command handler registered in the teloxide Dispatcher.

use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;

use tickwatch_core::config::TelegramConfig;
use tickwatch_core::types::{SubscriberId, Ticker};
use tickwatch_subs::{CancelOutcome, SubscriptionRegistry};

use crate::allow;
use crate::commands::Command;

/// Runs for every recognized command. Performs:
/// 1. Bot-message filter
/// 2. Allowlist check
/// 3. Command execution against the registry
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    registry: Arc<SubscriptionRegistry>,
    config: TelegramConfig,
) -> ResponseResult<()> {
    // Ignore messages from other bots.
    if msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return Ok(());
    }
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let username = from.username.as_deref().unwrap_or("");
    let user_id = from.id.0.to_string();
    if !allow::is_allowed(&config.allow_users, username, &user_id) {
        return Ok(());
    }

    // Notifications go to the chat the command came from.
    let subscriber = SubscriberId(msg.chat.id.0);

    let reply = match cmd {
        Command::Start => help_text(),
        Command::Subscribe { ticker, minutes } => {
            subscribe_reply(&registry, subscriber, &ticker, &minutes)
        }
        Command::Stop(arg) => stop_reply(&registry, subscriber, arg.trim()),
        Command::Status => status_reply(&registry, subscriber),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

fn help_text() -> String {
    "Hi! I send you exchange prices on a schedule.\n\
     /subscribe <ticker> <minutes> — e.g. /subscribe btc 5\n\
     /stop <ticker> — stop one ticker\n\
     /stop — stop all notifications\n\
     /status — list active tickers"
        .to_string()
}

fn subscribe_reply(
    registry: &Arc<SubscriptionRegistry>,
    subscriber: SubscriberId,
    ticker_raw: &str,
    minutes_raw: &str,
) -> String {
    let ticker = match Ticker::parse(ticker_raw) {
        Ok(t) => t,
        Err(_) => {
            return "Send a plain ticker symbol like btc, sol or not (without /USDT).".to_string()
        }
    };
    let minutes: u64 = match minutes_raw.trim().parse() {
        Ok(m) => m,
        Err(_) => return "Write the interval as a whole number of minutes, e.g. 1, 5 or 15.".to_string(),
    };
    if minutes < 1 {
        return "The minimum interval is 1 minute.".to_string();
    }

    match registry.subscribe(subscriber, ticker.clone(), Duration::from_secs(minutes.saturating_mul(60))) {
        Ok(_) => format!(
            "Done. Notifications for {ticker} every {minutes} minute(s).\n\
             Active tickers: {}\n\
             /stop {} — stop this ticker\n\
             /stop — stop all",
            registry.active_count(subscriber),
            ticker.as_str().to_ascii_lowercase(),
        ),
        Err(e) => format!("Could not subscribe: {e}"),
    }
}

fn stop_reply(registry: &Arc<SubscriptionRegistry>, subscriber: SubscriberId, arg: &str) -> String {
    // No argument: stop everything.
    if arg.is_empty() {
        return match registry.cancel_all(subscriber) {
            0 => "You have no active notifications.".to_string(),
            n => format!("All notifications stopped ({n})."),
        };
    }

    let ticker = match Ticker::parse(arg) {
        Ok(t) => t,
        Err(_) => return format!("No notifications found for {}.", arg.trim()),
    };
    match registry.cancel(subscriber, &ticker) {
        CancelOutcome::Stopped => {
            let remaining = registry.active_count(subscriber);
            if remaining > 0 {
                format!("Stopped {ticker}. Remaining tickers: {remaining}")
            } else {
                format!("Stopped {ticker} — that was the last one.")
            }
        }
        CancelOutcome::NotFound => format!("No notifications found for {ticker}."),
    }
}

fn status_reply(registry: &Arc<SubscriptionRegistry>, subscriber: SubscriberId) -> String {
    let entries = registry.entries(subscriber);
    if entries.is_empty() {
        return "No active notifications.".to_string();
    }
    let mut lines = vec![format!("Active tickers ({}):", entries.len())];
    for entry in entries {
        lines.push(format!(
            "{} — every {} min, since {}",
            entry.ticker,
            entry.interval.as_secs() / 60,
            entry.created_at.format("%Y-%m-%d %H:%M UTC"),
        ));
    }
    lines.join("\n")
}
