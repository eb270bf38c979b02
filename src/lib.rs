//! # papertrex
//!
//! Paper trading for Bittrex-style exchanges: limit orders are kept in memory
//! and aged by a background simulator that fills them with odds resembling a
//! live venue, without ever touching the exchange.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use papertrex::{FillTable, LifecycleSimulator, Market, OrderRegistry, OrderSide};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let registry = Arc::new(OrderRegistry::new());
//! let market = Market::new("BTC-ETH").unwrap();
//! let id = registry.submit(OrderSide::LimitBuy, market, 10.0, 0.05).unwrap();
//!
//! // A fresh buy order always fills on its first tick.
//! let sim = LifecycleSimulator::new(Arc::clone(&registry), FillTable::default());
//! let report = sim.tick(&mut StdRng::seed_from_u64(42));
//! assert_eq!(report.fulfilled, 1);
//!
//! let order = registry.get(id).unwrap();
//! assert!(!order.is_open());
//! assert_eq!(order.quantity_remaining, 0.0);
//! ```
//!
//! ## Lifecycle
//!
//! | Event | Effect |
//! |-------|--------|
//! | submit | open, `quantity_remaining == quantity` |
//! | partial fill | `quantity_remaining` redrawn, still open |
//! | full fill | `quantity_remaining == 0`, closed |
//! | cancel | closed, `cancel_initiated` |
//!
//! A closed order is frozen: neither the simulator nor a second cancel can
//! change it.
//!
//! ## Running in the background
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use papertrex::{LifecycleSimulator, OrderRegistry, SimulatorConfig};
//!
//! let registry = Arc::new(OrderRegistry::new());
//! let config = SimulatorConfig::default();
//! let sim = LifecycleSimulator::new(Arc::clone(&registry), config.table.clone());
//! let mut handle = sim.spawn(Duration::from_millis(50), config.rng()).unwrap();
//! handle.stop();
//! ```

mod error;
pub mod fill_model;
mod order;
pub mod projection;
mod registry;
mod side;
pub mod simulator;
mod types;

// Re-export public API
pub use error::{Error, Result};
pub use fill_model::{AgeBucket, FillTable, Odds, Outcome};
pub use order::SimOrder;
pub use projection::{OpenOrderView, OrderHistoryView, OrderView};
pub use registry::OrderRegistry;
pub use side::OrderSide;
pub use simulator::{LifecycleSimulator, SimulatorConfig, SimulatorHandle, TickReport};
pub use types::{Market, OrderId, Timestamp};
