//! Core types: OrderId, Market, Timestamp

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Error;

/// Wall-clock instant in UTC. Order ages are measured between two of these.
pub type Timestamp = DateTime<Utc>;

/// Unique order identifier.
///
/// Simulated orders get a random v4 UUID; live orders carry the UUID the
/// exchange assigned, so both modes share the same identifier type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Draw a fresh random identifier.
    pub fn random() -> Self {
        OrderId(Uuid::new_v4())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for OrderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(OrderId)
            .map_err(|e| Error::InvalidArgument(format!("invalid order id {s:?}: {e}")))
    }
}

/// Trading pair in `QUOTE-BASE` form, e.g. `BTC-ETH` (ETH priced in BTC).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Market(String);

impl Market {
    /// Validate and wrap a market name.
    ///
    /// Both halves must be non-empty ASCII alphanumerics separated by a
    /// single `-`.
    pub fn new(name: &str) -> Result<Self, Error> {
        let mut parts = name.split('-');
        let valid = match (parts.next(), parts.next(), parts.next()) {
            (Some(quote), Some(base), None) => is_currency(quote) && is_currency(base),
            _ => false,
        };
        if !valid {
            return Err(Error::InvalidArgument(format!(
                "unsupported market {name:?}, expected QUOTE-BASE"
            )));
        }
        Ok(Market(name.to_string()))
    }

    /// Build a market from a coin and the currency it is quoted in.
    ///
    /// `Market::from_pair("eth", "btc")` is `BTC-ETH`.
    pub fn from_pair(coin: &str, quote: &str) -> Result<Self, Error> {
        Market::new(&format!("{}-{}", quote.to_uppercase(), coin.to_uppercase()))
    }

    /// Split into `(quote, coin)`.
    pub fn split(&self) -> (&str, &str) {
        // new() guarantees exactly one separator
        self.0.split_once('-').unwrap_or((self.0.as_str(), ""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_currency(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Market {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Market::new(s)
    }
}

impl TryFrom<String> for Market {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Market::new(&value)
    }
}

impl From<Market> for String {
    fn from(market: Market) -> Self {
        market.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_roundtrips_through_display() {
        let id = OrderId::random();
        let parsed: OrderId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn order_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<OrderId>().is_err());
    }

    #[test]
    fn random_ids_differ() {
        assert_ne!(OrderId::random(), OrderId::random());
    }

    #[test]
    fn market_accepts_pair() {
        let m = Market::new("BTC-ETH").unwrap();
        assert_eq!(m.as_str(), "BTC-ETH");
        assert_eq!(m.split(), ("BTC", "ETH"));
    }

    #[test]
    fn market_rejects_malformed() {
        assert!(Market::new("").is_err());
        assert!(Market::new("BTCETH").is_err());
        assert!(Market::new("BTC-").is_err());
        assert!(Market::new("-ETH").is_err());
        assert!(Market::new("BTC-ETH-USD").is_err());
        assert!(Market::new("BTC-E TH").is_err());
    }

    #[test]
    fn market_from_pair_uppercases() {
        let m = Market::from_pair("eth", "usdt").unwrap();
        assert_eq!(m.as_str(), "USDT-ETH");
    }
}
