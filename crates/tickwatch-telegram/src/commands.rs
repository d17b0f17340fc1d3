//! Bot command definitions.
//!
//! The interval argument is kept as a `String` so the handler can answer a
//! bad number with a friendly correction instead of the command silently
//! failing to parse.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "show what this bot does")]
    Start,
    #[command(description = "subscribe: /subscribe <ticker> <minutes>", parse_with = "split")]
    Subscribe { ticker: String, minutes: String },
    #[command(description = "stop one ticker (/stop btc) or everything (/stop)")]
    Stop(String),
    #[command(description = "list active tickers")]
    Status,
}
