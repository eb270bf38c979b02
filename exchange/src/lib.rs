//! Exchange client trait and implementations for papertrex.
//!
//! Provides one `ExchangeClient` trait with two independent implementations,
//! chosen when the client is constructed:
//!
//! - **Paper** ([`paper::SimulatedClient`]): orders live in memory and are
//!   filled by the papertrex lifecycle simulator.
//! - **Bittrex** (feature `bittrex`): the live v1.1 REST API.
//!
//! [`config::connect`] builds either from a TOML configuration.

pub mod config;
pub mod error;
pub mod paper;
pub mod rate_limit;
pub mod types;

#[cfg(feature = "bittrex")]
pub mod bittrex;

pub use error::{ExchangeError, Result};
pub use types::*;

/// Order and account operations common to live and paper trading.
pub trait ExchangeClient: Send + Sync {
    /// Place a limit order. Returns the order ID.
    fn submit_limit_order(
        &self,
        market: &Market,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Result<OrderId>;

    /// Cancel an open order.
    fn cancel_order(&self, id: OrderId) -> Result<()>;

    /// Full record of one order, open or closed.
    fn get_order(&self, id: OrderId) -> Result<OrderView>;

    /// Open orders, optionally for one market.
    fn list_open_orders(&self, market: Option<&Market>) -> Result<Vec<OpenOrderView>>;

    /// Closed orders, optionally for one market.
    fn order_history(&self, market: Option<&Market>) -> Result<Vec<OrderHistoryView>>;

    /// All account balances.
    fn get_balances(&self) -> Result<Vec<Balance>>;

    /// Balance of a single currency.
    fn get_balance(&self, currency: &str) -> Result<Balance> {
        self.get_balances()?
            .into_iter()
            .find(|b| b.currency.eq_ignore_ascii_case(currency))
            .ok_or_else(|| ExchangeError::InvalidArgument(format!("no balance for {currency}")))
    }
}
