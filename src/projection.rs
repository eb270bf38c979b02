//! Read-only views of simulated orders, shaped like the exchange's records.
//!
//! Fields a live exchange fills from account state (reservations,
//! commissions, conditions) are fixed to their neutral defaults.

use crate::error::Result;
use crate::order::SimOrder;
use crate::registry::OrderRegistry;
use crate::{Market, OrderId, OrderSide, Timestamp};

/// An order as returned by the open-orders listing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct OpenOrderView {
    pub uuid: Option<OrderId>,
    pub order_uuid: OrderId,
    pub exchange: Market,
    pub order_type: OrderSide,
    pub quantity: f64,
    pub quantity_remaining: f64,
    pub limit: f64,
    pub commission_paid: f64,
    pub price: f64,
    pub price_per_unit: Option<f64>,
    pub opened: Timestamp,
    pub closed: Option<Timestamp>,
    pub cancel_initiated: bool,
    pub immediate_or_cancel: bool,
    pub is_conditional: bool,
    pub condition: Option<String>,
    pub condition_target: Option<String>,
}

/// The full record returned for a single order lookup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct OrderView {
    pub account_id: Option<String>,
    pub order_uuid: OrderId,
    pub exchange: Market,
    #[cfg_attr(feature = "serde", serde(rename = "Type"))]
    pub order_type: OrderSide,
    pub quantity: f64,
    pub quantity_remaining: f64,
    pub limit: f64,
    pub reserved: f64,
    pub reserve_remaining: f64,
    pub commission_reserved: f64,
    pub commission_reserve_remaining: f64,
    pub commission_paid: f64,
    pub price: f64,
    pub price_per_unit: Option<f64>,
    pub opened: Timestamp,
    pub closed: Option<Timestamp>,
    pub is_open: bool,
    pub sentinel: Option<String>,
    pub cancel_initiated: bool,
    pub immediate_or_cancel: bool,
    pub is_conditional: bool,
    pub condition: Option<String>,
    pub condition_target: Option<String>,
}

/// A closed order as listed in the account's order history.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct OrderHistoryView {
    pub order_uuid: OrderId,
    pub exchange: Market,
    pub time_stamp: Timestamp,
    pub order_type: OrderSide,
    pub limit: f64,
    pub quantity: f64,
    pub quantity_remaining: f64,
    pub commission: f64,
    pub price: f64,
    pub price_per_unit: Option<f64>,
    pub is_conditional: bool,
    pub condition: Option<String>,
    pub condition_target: Option<String>,
    pub immediate_or_cancel: bool,
}

impl From<&SimOrder> for OpenOrderView {
    fn from(o: &SimOrder) -> Self {
        Self {
            uuid: Some(o.id),
            order_uuid: o.id,
            exchange: o.market.clone(),
            order_type: o.side,
            quantity: o.quantity,
            quantity_remaining: o.quantity_remaining,
            limit: o.limit_price,
            commission_paid: 0.0,
            price: o.realized_price,
            price_per_unit: o.price_per_unit,
            opened: o.opened_at,
            closed: o.closed_at,
            cancel_initiated: o.cancel_initiated,
            immediate_or_cancel: false,
            is_conditional: false,
            condition: None,
            condition_target: None,
        }
    }
}

impl From<&SimOrder> for OrderView {
    fn from(o: &SimOrder) -> Self {
        Self {
            account_id: None,
            order_uuid: o.id,
            exchange: o.market.clone(),
            order_type: o.side,
            quantity: o.quantity,
            quantity_remaining: o.quantity_remaining,
            limit: o.limit_price,
            reserved: 0.0,
            reserve_remaining: 0.0,
            commission_reserved: 0.0,
            commission_reserve_remaining: 0.0,
            commission_paid: 0.0,
            price: o.realized_price,
            price_per_unit: o.price_per_unit,
            opened: o.opened_at,
            closed: o.closed_at,
            is_open: o.is_open(),
            sentinel: None,
            cancel_initiated: o.cancel_initiated,
            immediate_or_cancel: false,
            is_conditional: false,
            condition: None,
            condition_target: None,
        }
    }
}

impl From<&SimOrder> for OrderHistoryView {
    fn from(o: &SimOrder) -> Self {
        Self {
            order_uuid: o.id,
            exchange: o.market.clone(),
            time_stamp: o.opened_at,
            order_type: o.side,
            limit: o.limit_price,
            quantity: o.quantity,
            quantity_remaining: o.quantity_remaining,
            commission: 0.0,
            price: o.realized_price,
            price_per_unit: o.price_per_unit,
            is_conditional: false,
            condition: None,
            condition_target: None,
            immediate_or_cancel: false,
        }
    }
}

/// Full view of one order.
pub fn project_order(registry: &OrderRegistry, id: OrderId) -> Result<OrderView> {
    registry.get(id).map(|o| OrderView::from(&o))
}

/// Open-order views, optionally for one market.
pub fn project_open(registry: &OrderRegistry, market: Option<&Market>) -> Vec<OpenOrderView> {
    registry
        .list_open(market)
        .iter()
        .map(OpenOrderView::from)
        .collect()
}

/// History views of closed orders, optionally for one market.
pub fn project_history(registry: &OrderRegistry, market: Option<&Market>) -> Vec<OrderHistoryView> {
    registry
        .list_closed(market)
        .iter()
        .map(OrderHistoryView::from)
        .collect()
}
