//! `tickwatch-mexc` — [`ValueSource`] over the MEXC spot ticker endpoint.
//!
//! One GET per fetch: `{base_url}/api/v3/ticker/price?symbol=<PAIR>`. The
//! response body is `{"symbol": "...", "price": "67123.45"}` with the price
//! as a decimal string.
//!
//! Every failure mode — connect error, timeout, non-200 status, missing or
//! unparsable price — collapses into `None`. The scheduler treats `None` as
//! "pair does not exist" and ends the job; this boundary deliberately cannot
//! distinguish a delisted pair from a flaky network.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use tickwatch_core::types::Ticker;
use tickwatch_subs::ValueSource;

/// Path of the single-symbol ticker price endpoint.
const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";

/// Wire shape of a ticker price response.
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// MEXC-backed price source.
pub struct MexcSource {
    http: reqwest::Client,
    base_url: String,
}

impl MexcSource {
    /// Build a source with a per-request timeout on the underlying client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ValueSource for MexcSource {
    fn label(&self) -> &str {
        "MEXC"
    }

    async fn fetch(&self, ticker: &Ticker) -> Option<f64> {
        let pair = ticker.pair();
        let url = format!("{}{}", self.base_url, TICKER_PRICE_PATH);

        let response = match self
            .http
            .get(&url)
            .query(&[("symbol", pair.as_str())])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                debug!(%pair, error = %e, "ticker request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(%pair, status = %response.status(), "ticker request rejected");
            return None;
        }

        let body: TickerPrice = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                debug!(%pair, error = %e, "ticker response body unreadable");
                return None;
            }
        };

        match body.price.parse::<f64>() {
            Ok(price) => Some(price),
            Err(e) => {
                // A 200 with a garbage price field is worth more than a debug line.
                warn!(%pair, price = %body.price, error = %e, "unparsable price in ticker response");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_price_deserializes() {
        let body: TickerPrice =
            serde_json::from_str(r#"{"symbol":"SOLUSDT","price":"142.5"}"#).unwrap();
        assert_eq!(body.price, "142.5");
        assert_eq!(body.price.parse::<f64>().unwrap(), 142.5);
    }

    #[test]
    fn missing_price_field_is_an_error() {
        let res: Result<TickerPrice, _> = serde_json::from_str(r#"{"symbol":"SOLUSDT"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn full_precision_survives_the_string_roundtrip() {
        let body: TickerPrice = serde_json::from_str(r#"{"price":"67123.456789"}"#).unwrap();
        let price = body.price.parse::<f64>().unwrap();
        assert_eq!(format!("{price}"), "67123.456789");
    }
}
