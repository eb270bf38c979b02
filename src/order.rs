//! Unified order record and its lifecycle transitions

use crate::error::{Error, Result};
use crate::{Market, OrderId, OrderSide, Timestamp};

/// A simulated limit order.
///
/// The registry owns every record for its whole lifetime and only hands out
/// clones, so stored records change solely through registry and simulator
/// operations. Once `closed_at` is set the record is terminal and every mutating method refuses with
/// [`Error::AlreadyClosed`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimOrder {
    /// Unique identifier assigned at creation
    pub id: OrderId,
    /// Trading pair
    pub market: Market,
    /// Limit buy or limit sell
    pub side: OrderSide,
    /// Quantity requested at submission
    pub quantity: f64,
    /// Quantity not yet filled
    pub quantity_remaining: f64,
    /// Requested limit price
    pub limit_price: f64,
    /// Average fill price, unset until the first fill
    pub price_per_unit: Option<f64>,
    /// Executed notional so far
    pub realized_price: f64,
    /// When the order was submitted
    pub opened_at: Timestamp,
    /// When the order was filled or cancelled
    pub closed_at: Option<Timestamp>,
    /// True only if the close came from a cancel
    pub cancel_initiated: bool,
}

impl SimOrder {
    /// Create an open order with nothing filled.
    pub fn new(
        id: OrderId,
        market: Market,
        side: OrderSide,
        quantity: f64,
        limit_price: f64,
        opened_at: Timestamp,
    ) -> Self {
        Self {
            id,
            market,
            side,
            quantity,
            quantity_remaining: quantity,
            limit_price,
            price_per_unit: None,
            realized_price: 0.0,
            opened_at,
            closed_at: None,
            cancel_initiated: false,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Quantity executed so far.
    #[inline]
    pub fn filled_quantity(&self) -> f64 {
        self.quantity - self.quantity_remaining
    }

    /// Seconds between submission and `now`.
    pub fn age_secs(&self, now: Timestamp) -> f64 {
        (now - self.opened_at).num_milliseconds() as f64 / 1000.0
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::AlreadyClosed(self.id))
        }
    }

    /// Fill the whole order at its limit price and close it.
    pub fn fulfill(&mut self, now: Timestamp) -> Result<()> {
        self.ensure_open()?;
        self.quantity_remaining = 0.0;
        self.price_per_unit = Some(self.limit_price);
        self.realized_price = self.quantity * self.limit_price;
        self.closed_at = Some(now);
        self.cancel_initiated = false;
        Ok(())
    }

    /// Replace the remaining quantity after a partial execution at the limit.
    ///
    /// `remaining` is the new unfilled quantity, not the amount just filled.
    /// It is clamped into `[0, quantity]`. The order stays open.
    pub fn partly_fill(&mut self, remaining: f64) -> Result<()> {
        self.ensure_open()?;
        self.quantity_remaining = remaining.clamp(0.0, self.quantity);
        self.price_per_unit = Some(self.limit_price);
        self.realized_price = self.filled_quantity() * self.limit_price;
        Ok(())
    }

    /// Close the order on request. The remaining quantity is left as it was.
    pub fn cancel(&mut self, now: Timestamp) -> Result<()> {
        self.ensure_open()?;
        self.closed_at = Some(now);
        self.cancel_initiated = true;
        self.price_per_unit = Some(self.limit_price);
        self.realized_price = self.quantity * self.limit_price;
        Ok(())
    }
}
