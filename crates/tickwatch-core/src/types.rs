use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Quote asset every ticker is paired against on the exchange.
pub const QUOTE_ASSET: &str = "USDT";

/// Identity a notification stream is addressed to.
///
/// In the shipped bot this is the Telegram chat ID, but the subscription core
/// treats it as opaque — it is only ever used as a registry key and as the
/// delivery address handed to the `Notifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub i64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SubscriberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Normalized ticker symbol (e.g. `BTC`, `SOL`).
///
/// Input is accepted case-insensitively and canonicalized to ASCII uppercase,
/// so `btc`, `Btc` and `BTC` all name the same subscription key. Construction
/// goes through [`Ticker::parse`], which rejects empty input and anything
/// outside the exchange symbol alphabet (ASCII letters and digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Parse and normalize a user-supplied ticker.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidTicker("empty ticker".to_string()));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidTicker(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exchange trading pair for this ticker, e.g. `SOLUSDT`.
    pub fn pair(&self) -> String {
        format!("{}{}", self.0, QUOTE_ASSET)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_uppercased() {
        let t = Ticker::parse("sol").unwrap();
        assert_eq!(t.as_str(), "SOL");
        assert_eq!(t.pair(), "SOLUSDT");
    }

    #[test]
    fn ticker_trims_whitespace() {
        let t = Ticker::parse("  btc \n").unwrap();
        assert_eq!(t.as_str(), "BTC");
    }

    #[test]
    fn case_variants_are_the_same_key() {
        assert_eq!(Ticker::parse("Not").unwrap(), Ticker::parse("NOT").unwrap());
    }

    #[test]
    fn empty_ticker_is_rejected() {
        assert!(Ticker::parse("").is_err());
        assert!(Ticker::parse("   ").is_err());
    }

    #[test]
    fn non_alphanumeric_ticker_is_rejected() {
        assert!(Ticker::parse("BTC/USDT").is_err());
        assert!(Ticker::parse("btc usdt").is_err());
    }

    #[test]
    fn numeric_suffixes_are_allowed() {
        // e.g. 1INCH-style symbols
        let t = Ticker::parse("1inch").unwrap();
        assert_eq!(t.pair(), "1INCHUSDT");
    }
}
