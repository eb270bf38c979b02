//! Order side: limit buy or limit sell

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Side of a limit order, named the way the exchange reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderSide {
    #[cfg_attr(feature = "serde", serde(rename = "LIMIT_BUY"))]
    LimitBuy,
    #[cfg_attr(feature = "serde", serde(rename = "LIMIT_SELL"))]
    LimitSell,
}

impl OrderSide {
    #[inline]
    pub fn is_buy(self) -> bool {
        self == OrderSide::LimitBuy
    }

    /// Wire name, `LIMIT_BUY` or `LIMIT_SELL`.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::LimitBuy => "LIMIT_BUY",
            OrderSide::LimitSell => "LIMIT_SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIMIT_BUY" => Ok(OrderSide::LimitBuy),
            "LIMIT_SELL" => Ok(OrderSide::LimitSell),
            other => Err(Error::InvalidArgument(format!("unknown order type {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(format!("{}", OrderSide::LimitBuy), "LIMIT_BUY");
        assert_eq!(format!("{}", OrderSide::LimitSell), "LIMIT_SELL");
    }

    #[test]
    fn parse() {
        assert_eq!("LIMIT_SELL".parse::<OrderSide>().unwrap(), OrderSide::LimitSell);
        assert!("MARKET_BUY".parse::<OrderSide>().is_err());
        assert!("limit_buy".parse::<OrderSide>().is_err());
    }
}
