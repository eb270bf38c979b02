//! Live Bittrex implementation of [`ExchangeClient`].

pub mod auth;
pub mod client;
pub mod types;

use std::time::Duration;

use log::info;
use serde::de::IgnoredAny;

use crate::ExchangeClient;
use crate::error::{ExchangeError, Result};
use crate::types::*;
use client::{Group, RestClient};
use types::{
    WireBalance, WireMarket, WireOpenOrder, WireOrder, WireOrderHistory, WireTicker, WireUuid,
};

/// Bittrex v1.1 account client.
///
/// Calls are synchronous; exchange rejections come back as
/// `ExchangeError::Upstream` with the exchange's message and are never
/// retried.
pub struct BittrexClient {
    api: RestClient,
}

impl BittrexClient {
    pub fn new(
        api_key: &str,
        secret: &str,
        rate_limit_per_sec: usize,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api: RestClient::new(api_key, secret, rate_limit_per_sec, timeout)?,
        })
    }

    /// Send requests to another host instead of bittrex.com.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api = self.api.with_base_url(base_url);
        self
    }

    /// All markets listed on the exchange.
    pub fn markets(&self) -> Result<Vec<WireMarket>> {
        self.api
            .get(Group::Public, "getmarkets", &[])?
            .into_result("getmarkets")
    }

    /// Current bid, ask, and last price of one market.
    pub fn ticker(&self, market: &Market) -> Result<WireTicker> {
        self.api
            .get(Group::Public, "getticker", &[("market", market.to_string())])?
            .into_result("getticker")
    }

    /// Balance of one currency through the dedicated endpoint.
    pub fn balance(&self, currency: &str) -> Result<Balance> {
        let wire: WireBalance = self
            .api
            .get(Group::Account, "getbalance", &[("currency", currency.to_string())])?
            .into_result("getbalance")?;
        Ok(wire.into())
    }
}

fn validate_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ExchangeError::InvalidArgument(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}

fn market_filter(market: Option<&Market>) -> Vec<(&'static str, String)> {
    market
        .map(|m| vec![("market", m.to_string())])
        .unwrap_or_default()
}

impl ExchangeClient for BittrexClient {
    fn submit_limit_order(
        &self,
        market: &Market,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Result<OrderId> {
        validate_positive("quantity", quantity)?;
        validate_positive("limit price", price)?;

        let method = if side.is_buy() { "buylimit" } else { "selllimit" };
        let params = [
            ("market", market.to_string()),
            ("quantity", quantity.to_string()),
            ("rate", price.to_string()),
        ];
        let placed: WireUuid = self
            .api
            .get(Group::Market, method, &params)?
            .into_result(method)?;
        let id = placed.order_id()?;
        info!("Bittrex {side} {market}: {quantity} x {price} (id={id})");
        Ok(id)
    }

    fn cancel_order(&self, id: OrderId) -> Result<()> {
        self.api
            .get::<IgnoredAny>(Group::Market, "cancel", &[("uuid", id.to_string())])?
            .into_ack()?;
        info!("Bittrex cancel requested (id={id})");
        Ok(())
    }

    fn get_order(&self, id: OrderId) -> Result<OrderView> {
        let wire: WireOrder = self
            .api
            .get(Group::Account, "getorder", &[("uuid", id.to_string())])?
            .into_result("getorder")?;
        wire.try_into()
    }

    fn list_open_orders(&self, market: Option<&Market>) -> Result<Vec<OpenOrderView>> {
        let wire: Vec<WireOpenOrder> = self
            .api
            .get(Group::Market, "getopenorders", &market_filter(market))?
            .into_result("getopenorders")?;
        wire.into_iter().map(OpenOrderView::try_from).collect()
    }

    fn order_history(&self, market: Option<&Market>) -> Result<Vec<OrderHistoryView>> {
        let wire: Vec<WireOrderHistory> = self
            .api
            .get(Group::Account, "getorderhistory", &market_filter(market))?
            .into_result("getorderhistory")?;
        wire.into_iter().map(OrderHistoryView::try_from).collect()
    }

    fn get_balances(&self) -> Result<Vec<Balance>> {
        let wire: Vec<WireBalance> = self
            .api
            .get(Group::Account, "getbalances", &[])?
            .into_result("getbalances")?;
        Ok(wire.into_iter().map(Balance::from).collect())
    }

    fn get_balance(&self, currency: &str) -> Result<Balance> {
        self.balance(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    fn offline_client() -> BittrexClient {
        // Port 9 (discard) on localhost refuses connections.
        BittrexClient::new("k", "s", 5, Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9")
    }

    #[test]
    fn market_filter_shapes() {
        assert!(market_filter(None).is_empty());
        let m = Market::new("BTC-ETH").unwrap();
        assert_eq!(market_filter(Some(&m)), vec![("market", "BTC-ETH".to_string())]);
    }

    #[test]
    fn invalid_order_rejected_before_request() {
        let client = offline_client();
        let market = Market::new("BTC-ETH").unwrap();
        let bad = [
            (-1.0, 0.0),
            (0.0, 1.0),
            (1.0, -2.0),
            (f64::NAN, 1.0),
            (1.0, f64::INFINITY),
        ];
        for (qty, price) in bad {
            for side in [OrderSide::LimitBuy, OrderSide::LimitSell] {
                let result = client.submit_limit_order(&market, side, qty, price);
                assert!(
                    matches!(result, Err(ExchangeError::InvalidArgument(_))),
                    "{side} {qty} @ {price}: {result:?}"
                );
            }
        }
    }

    #[test]
    fn unreachable_host_is_upstream_error() {
        assert!(matches!(
            offline_client().get_balances(),
            Err(ExchangeError::Upstream(_))
        ));
    }

    #[test]
    fn silent_host_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            // Read the request, never answer.
            for mut stream in listener.incoming().flatten() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                thread::sleep(Duration::from_secs(5));
            }
        });

        let client = BittrexClient::new("KEY", "s", 5, Duration::from_millis(300))
            .unwrap()
            .with_base_url(&format!("http://{addr}"));
        match client.get_balances() {
            Err(ExchangeError::Timeout(msg)) => {
                assert!(msg.starts_with("getbalances"), "{msg}");
                assert!(!msg.contains("apikey"), "{msg}");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
