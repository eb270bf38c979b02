//! Errors returned by registry and projection operations.

use crate::types::OrderId;

/// Errors surfaced to callers of the simulated order registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No order with this id was ever submitted.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// The order is already filled or cancelled.
    #[error("order already closed: {0}")]
    AlreadyClosed(OrderId),

    /// Non-positive quantity or price, or an unsupported market.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
