//! In-memory store of simulated orders.
//!
//! One mutex guards every record and the id index, so a caller's cancel and
//! the simulator's fill pass can never interleave on the same order. Every
//! mutation re-checks `closed_at` after taking the lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::order::SimOrder;
use crate::{Market, OrderId, OrderSide, Timestamp};

#[derive(Default)]
struct Inner {
    /// Insertion order
    orders: Vec<SimOrder>,
    /// OrderId → position in `orders`
    index: FxHashMap<OrderId, usize>,
}

impl Inner {
    fn find(&self, id: OrderId) -> Result<usize> {
        self.index.get(&id).copied().ok_or(Error::NotFound(id))
    }
}

/// Shared registry of simulated orders.
#[derive(Default)]
pub struct OrderRegistry {
    inner: Mutex<Inner>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // SimOrder transitions never leave a record half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new open order and return its id.
    pub fn submit(
        &self,
        side: OrderSide,
        market: Market,
        quantity: f64,
        limit_price: f64,
    ) -> Result<OrderId> {
        self.submit_at(side, market, quantity, limit_price, Utc::now())
    }

    /// Like [`submit`](Self::submit) with an explicit open time.
    pub fn submit_at(
        &self,
        side: OrderSide,
        market: Market,
        quantity: f64,
        limit_price: f64,
        opened_at: Timestamp,
    ) -> Result<OrderId> {
        validate_positive("quantity", quantity)?;
        validate_positive("limit price", limit_price)?;

        let mut inner = self.lock();
        let mut id = OrderId::random();
        while inner.index.contains_key(&id) {
            id = OrderId::random();
        }

        info!(
            "{side} {market}: {quantity:.8} x {limit_price:.8} = {:.8} (id={id})",
            quantity * limit_price
        );

        let position = inner.orders.len();
        inner
            .orders
            .push(SimOrder::new(id, market, side, quantity, limit_price, opened_at));
        inner.index.insert(id, position);
        Ok(id)
    }

    /// Cancel an open order.
    pub fn cancel(&self, id: OrderId) -> Result<()> {
        let mut inner = self.lock();
        let position = inner.find(id)?;
        let order = &mut inner.orders[position];
        order.cancel(Utc::now())?;
        info!(
            "Cancelled {} {} qty={:.8} remaining={:.8} (id={id})",
            order.side, order.market, order.quantity, order.quantity_remaining
        );
        Ok(())
    }

    /// Snapshot of one order. Changing the copy leaves the stored record as is.
    pub fn get(&self, id: OrderId) -> Result<SimOrder> {
        let inner = self.lock();
        let position = inner.find(id)?;
        Ok(inner.orders[position].clone())
    }

    /// Open orders, optionally restricted to one market, in submission order.
    pub fn list_open(&self, market: Option<&Market>) -> Vec<SimOrder> {
        self.collect(|o| o.is_open() && market.is_none_or(|m| &o.market == m))
    }

    /// Filled or cancelled orders, optionally restricted to one market.
    pub fn list_closed(&self, market: Option<&Market>) -> Vec<SimOrder> {
        self.collect(|o| !o.is_open() && market.is_none_or(|m| &o.market == m))
    }

    /// Every open order at this instant.
    pub fn open_snapshot(&self) -> Vec<SimOrder> {
        self.list_open(None)
    }

    fn collect(&self, keep: impl Fn(&SimOrder) -> bool) -> Vec<SimOrder> {
        self.lock()
            .orders
            .iter()
            .filter(|&o| keep(o))
            .cloned()
            .collect()
    }

    /// Run `f` on an order that is still open, under the registry lock.
    ///
    /// Fails with `NotFound` for unknown ids and `AlreadyClosed` if the order
    /// was closed since the caller last looked at it.
    pub(crate) fn update_open<R>(
        &self,
        id: OrderId,
        f: impl FnOnce(&mut SimOrder) -> R,
    ) -> Result<R> {
        let mut inner = self.lock();
        let position = inner.find(id)?;
        let order = &mut inner.orders[position];
        if !order.is_open() {
            debug!("Order {id} closed before update");
            return Err(Error::AlreadyClosed(id));
        }
        Ok(f(order))
    }

    pub fn len(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}
