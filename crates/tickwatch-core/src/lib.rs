//! `tickwatch-core` — shared types, configuration and errors.
//!
//! Everything in here is plain data: the subscriber/ticker identifiers used
//! as registry keys by `tickwatch-subs`, and the figment-based application
//! config (`tickwatch.toml` + `TICKWATCH_*` env overrides).

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use types::{SubscriberId, Ticker};
