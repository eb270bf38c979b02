//! Shared client types: balances and the order views re-exported from the core.

pub use papertrex::{Market, OpenOrderView, OrderHistoryView, OrderId, OrderSide, OrderView};

/// Holdings of one currency in the account.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub currency: String,
    /// Total held, including amounts reserved by open orders.
    pub balance: f64,
    pub available: f64,
    pub pending: f64,
    pub crypto_address: Option<String>,
}

impl Balance {
    /// Amount tied up in open orders or withdrawals.
    pub fn reserved(&self) -> f64 {
        self.balance - self.available
    }
}
