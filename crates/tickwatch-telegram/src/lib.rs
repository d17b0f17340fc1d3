//! `tickwatch-telegram` — Telegram command surface and notifier.
//!
//! Long-polling teloxide adapter exposing `/start`, `/subscribe`, `/stop`
//! and `/status`, plus the [`notify::TelegramNotifier`] that job loops use
//! for outbound price messages.

pub mod adapter;
pub mod allow;
pub mod commands;
pub mod handler;
pub mod notify;

pub use adapter::TelegramAdapter;
pub use notify::TelegramNotifier;
