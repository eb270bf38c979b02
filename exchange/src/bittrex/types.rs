//! Bittrex v1.1 wire records and their conversion into the shared views.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use papertrex::Timestamp;

use crate::error::{ExchangeError, Result};
use crate::types::*;

/// Timestamp layout used by every Bittrex record. A trailing `.fraction`
/// is dropped before parsing.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Response envelope wrapping every call.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// The `result` payload, or the exchange's message as an error.
    pub fn into_result(self, method: &str) -> Result<T> {
        if !self.success {
            return Err(ExchangeError::Upstream(self.message));
        }
        self.result
            .ok_or_else(|| ExchangeError::Upstream(format!("{method} response has no result")))
    }

    /// Success check for calls whose `result` carries nothing.
    pub fn into_ack(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(ExchangeError::Upstream(self.message))
        }
    }
}

/// Parse a response body into its envelope.
pub fn decode<T: DeserializeOwned>(method: &str, body: &str) -> Result<ApiResponse<T>> {
    serde_json::from_str(body)
        .map_err(|e| ExchangeError::Upstream(format!("failed to parse {method} response: {e}")))
}

/// Parse a Bittrex timestamp such as `2014-07-09T03:21:20.08`.
pub fn parse_timestamp(s: &str) -> Result<Timestamp> {
    let whole = s.split_once('.').map_or(s, |(head, _)| head);
    NaiveDateTime::parse_from_str(whole, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| ExchangeError::Upstream(format!("bad timestamp {s:?}: {e}")))
}

fn parse_optional_timestamp(s: Option<&str>) -> Result<Option<Timestamp>> {
    s.map(parse_timestamp).transpose()
}

fn parse_id(s: &str) -> Result<OrderId> {
    s.parse()
        .map_err(|_| ExchangeError::Upstream(format!("bad order uuid {s:?}")))
}

fn parse_market(s: &str) -> Result<Market> {
    Market::new(s).map_err(|_| ExchangeError::Upstream(format!("bad market {s:?}")))
}

fn parse_side(s: &str) -> Result<OrderSide> {
    s.parse()
        .map_err(|_| ExchangeError::Upstream(format!("unknown order type {s:?}")))
}

/// `ConditionTarget` arrives as a number, a string, or null.
fn target_string(v: Option<serde_json::Value>) -> Option<String> {
    match v? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// `uuid` returned by `buylimit` and `selllimit`.
#[derive(Debug, Deserialize)]
pub struct WireUuid {
    pub uuid: String,
}

impl WireUuid {
    pub fn order_id(&self) -> Result<OrderId> {
        parse_id(&self.uuid)
    }
}

/// Entry of `market/getopenorders`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireOpenOrder {
    #[serde(default)]
    pub uuid: Option<String>,
    pub order_uuid: String,
    pub exchange: String,
    pub order_type: String,
    pub quantity: f64,
    pub quantity_remaining: f64,
    pub limit: f64,
    #[serde(default)]
    pub commission_paid: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_per_unit: Option<f64>,
    pub opened: String,
    #[serde(default)]
    pub closed: Option<String>,
    #[serde(default)]
    pub cancel_initiated: bool,
    #[serde(default)]
    pub immediate_or_cancel: bool,
    #[serde(default)]
    pub is_conditional: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_target: Option<serde_json::Value>,
}

impl TryFrom<WireOpenOrder> for OpenOrderView {
    type Error = ExchangeError;

    fn try_from(w: WireOpenOrder) -> Result<Self> {
        Ok(Self {
            uuid: w.uuid.as_deref().map(parse_id).transpose()?,
            order_uuid: parse_id(&w.order_uuid)?,
            exchange: parse_market(&w.exchange)?,
            order_type: parse_side(&w.order_type)?,
            quantity: w.quantity,
            quantity_remaining: w.quantity_remaining,
            limit: w.limit,
            commission_paid: w.commission_paid,
            price: w.price,
            price_per_unit: w.price_per_unit,
            opened: parse_timestamp(&w.opened)?,
            closed: parse_optional_timestamp(w.closed.as_deref())?,
            cancel_initiated: w.cancel_initiated,
            immediate_or_cancel: w.immediate_or_cancel,
            is_conditional: w.is_conditional,
            condition: w.condition,
            condition_target: target_string(w.condition_target),
        })
    }
}

/// Result of `account/getorder`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireOrder {
    #[serde(default)]
    pub account_id: Option<String>,
    pub order_uuid: String,
    pub exchange: String,
    #[serde(rename = "Type")]
    pub order_type: String,
    pub quantity: f64,
    pub quantity_remaining: f64,
    pub limit: f64,
    #[serde(default)]
    pub reserved: f64,
    #[serde(default)]
    pub reserve_remaining: f64,
    #[serde(default)]
    pub commission_reserved: f64,
    #[serde(default)]
    pub commission_reserve_remaining: f64,
    #[serde(default)]
    pub commission_paid: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_per_unit: Option<f64>,
    pub opened: String,
    #[serde(default)]
    pub closed: Option<String>,
    pub is_open: bool,
    #[serde(default)]
    pub sentinel: Option<String>,
    #[serde(default)]
    pub cancel_initiated: bool,
    #[serde(default)]
    pub immediate_or_cancel: bool,
    #[serde(default)]
    pub is_conditional: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_target: Option<serde_json::Value>,
}

impl TryFrom<WireOrder> for OrderView {
    type Error = ExchangeError;

    fn try_from(w: WireOrder) -> Result<Self> {
        Ok(Self {
            account_id: w.account_id,
            order_uuid: parse_id(&w.order_uuid)?,
            exchange: parse_market(&w.exchange)?,
            order_type: parse_side(&w.order_type)?,
            quantity: w.quantity,
            quantity_remaining: w.quantity_remaining,
            limit: w.limit,
            reserved: w.reserved,
            reserve_remaining: w.reserve_remaining,
            commission_reserved: w.commission_reserved,
            commission_reserve_remaining: w.commission_reserve_remaining,
            commission_paid: w.commission_paid,
            price: w.price,
            price_per_unit: w.price_per_unit,
            opened: parse_timestamp(&w.opened)?,
            closed: parse_optional_timestamp(w.closed.as_deref())?,
            is_open: w.is_open,
            sentinel: w.sentinel,
            cancel_initiated: w.cancel_initiated,
            immediate_or_cancel: w.immediate_or_cancel,
            is_conditional: w.is_conditional,
            condition: w.condition,
            condition_target: target_string(w.condition_target),
        })
    }
}

/// Entry of `account/getorderhistory`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireOrderHistory {
    pub order_uuid: String,
    pub exchange: String,
    pub time_stamp: String,
    pub order_type: String,
    pub limit: f64,
    pub quantity: f64,
    pub quantity_remaining: f64,
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_per_unit: Option<f64>,
    #[serde(default)]
    pub is_conditional: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_target: Option<serde_json::Value>,
    #[serde(default)]
    pub immediate_or_cancel: bool,
}

impl TryFrom<WireOrderHistory> for OrderHistoryView {
    type Error = ExchangeError;

    fn try_from(w: WireOrderHistory) -> Result<Self> {
        Ok(Self {
            order_uuid: parse_id(&w.order_uuid)?,
            exchange: parse_market(&w.exchange)?,
            time_stamp: parse_timestamp(&w.time_stamp)?,
            order_type: parse_side(&w.order_type)?,
            limit: w.limit,
            quantity: w.quantity,
            quantity_remaining: w.quantity_remaining,
            commission: w.commission,
            price: w.price,
            price_per_unit: w.price_per_unit,
            is_conditional: w.is_conditional,
            condition: w.condition,
            condition_target: target_string(w.condition_target),
            immediate_or_cancel: w.immediate_or_cancel,
        })
    }
}

/// Entry of `account/getbalances`, or the result of `account/getbalance`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBalance {
    pub currency: String,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub available: Option<f64>,
    #[serde(default)]
    pub pending: Option<f64>,
    #[serde(default)]
    pub crypto_address: Option<String>,
    #[serde(default)]
    pub requested: Option<bool>,
    #[serde(default)]
    pub uuid: Option<String>,
}

impl From<WireBalance> for Balance {
    fn from(w: WireBalance) -> Self {
        Self {
            currency: w.currency,
            balance: w.balance.unwrap_or(0.0),
            available: w.available.unwrap_or(0.0),
            pending: w.pending.unwrap_or(0.0),
            crypto_address: w.crypto_address,
        }
    }
}

/// Result of `public/getticker`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireTicker {
    pub bid: f64,
    pub ask: f64,
    pub last: f64,
}

/// Entry of `public/getmarkets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireMarket {
    pub market_currency: String,
    pub base_currency: String,
    #[serde(default)]
    pub market_currency_long: Option<String>,
    #[serde(default)]
    pub base_currency_long: Option<String>,
    #[serde(default)]
    pub min_trade_size: f64,
    pub market_name: String,
    pub is_active: bool,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

impl WireMarket {
    pub fn market(&self) -> Result<Market> {
        parse_market(&self.market_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn timestamp_fraction_truncated() {
        let ts = parse_timestamp("2014-07-09T03:21:20.08").unwrap();
        assert_eq!(ts, parse_timestamp("2014-07-09T03:21:20").unwrap());
        assert_eq!((ts.year(), ts.month(), ts.day()), (2014, 7, 9));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (3, 21, 20));
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn bad_timestamp() {
        assert!(matches!(
            parse_timestamp("09/07/2014"),
            Err(ExchangeError::Upstream(_))
        ));
    }

    #[test]
    fn condition_target_shapes() {
        assert_eq!(target_string(None), None);
        assert_eq!(target_string(Some(serde_json::Value::Null)), None);
        assert_eq!(
            target_string(Some(serde_json::json!(0.5))),
            Some("0.5".to_string())
        );
        assert_eq!(
            target_string(Some(serde_json::json!("x"))),
            Some("x".to_string())
        );
    }

    #[test]
    fn failed_envelope_keeps_message() {
        let resp: ApiResponse<WireUuid> =
            decode("buylimit", r#"{"success":false,"message":"INSUFFICIENT_FUNDS","result":null}"#)
                .unwrap();
        match resp.into_result("buylimit") {
            Err(ExchangeError::Upstream(msg)) => assert_eq!(msg, "INSUFFICIENT_FUNDS"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_error() {
        let resp: ApiResponse<WireUuid> =
            decode("buylimit", r#"{"success":true,"message":"","result":null}"#).unwrap();
        assert!(resp.into_result("buylimit").is_err());
    }

    #[test]
    fn ack_ignores_null_result() {
        let resp: ApiResponse<serde::de::IgnoredAny> =
            decode("cancel", r#"{"success":true,"message":"","result":null}"#).unwrap();
        assert!(resp.into_ack().is_ok());
    }
}
