//! Paper trading client: orders are kept in memory and filled by the
//! lifecycle simulator instead of reaching the exchange.
//!
//! ```
//! use papertrex_exchange::paper::SimulatedClient;
//! use papertrex_exchange::{ExchangeClient, Market, OrderSide};
//!
//! let client = SimulatedClient::builder()
//!     .seed(7)
//!     .autostart(false)
//!     .build()
//!     .unwrap();
//!
//! let market = Market::new("BTC-ETH").unwrap();
//! let id = client
//!     .submit_limit_order(&market, OrderSide::LimitBuy, 10.0, 0.05)
//!     .unwrap();
//! assert_eq!(client.list_open_orders(Some(&market)).unwrap().len(), 1);
//!
//! client.cancel_order(id).unwrap();
//! assert!(client.get_order(id).unwrap().cancel_initiated);
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::info;
use papertrex::projection::{project_history, project_open, project_order};
use papertrex::{
    FillTable, LifecycleSimulator, OrderRegistry, SimulatorConfig, SimulatorHandle,
};

use crate::error::{ExchangeError, Result};
use crate::types::*;
use crate::ExchangeClient;

/// Builder for `SimulatedClient`.
pub struct SimulatedClientBuilder {
    config: SimulatorConfig,
    autostart: bool,
}

impl SimulatedClientBuilder {
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = interval;
        self
    }

    /// Seed the fill decisions for a reproducible run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn fill_table(mut self, table: FillTable) -> Self {
        self.config.table = table;
        self
    }

    /// Start the background simulator on `build` (default `true`).
    pub fn autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    pub fn build(self) -> Result<SimulatedClient> {
        if self.config.tick_interval.is_zero() {
            return Err(ExchangeError::InvalidArgument(
                "tick interval must be non-zero".into(),
            ));
        }
        let registry = Arc::new(OrderRegistry::new());
        let simulator = LifecycleSimulator::new(Arc::clone(&registry), self.config.table.clone());
        let client = SimulatedClient {
            registry,
            simulator,
            config: self.config,
            handle: Mutex::new(None),
        };
        if self.autostart {
            client.start()?;
        }
        Ok(client)
    }
}

/// Exchange client backed by the in-memory order registry.
///
/// Balances are not simulated; `get_balances` reports `Unsupported`.
pub struct SimulatedClient {
    registry: Arc<OrderRegistry>,
    simulator: LifecycleSimulator,
    config: SimulatorConfig,
    handle: Mutex<Option<SimulatorHandle>>,
}

impl SimulatedClient {
    pub fn builder() -> SimulatedClientBuilder {
        SimulatedClientBuilder {
            config: SimulatorConfig::default(),
            autostart: true,
        }
    }

    /// Build and start a client from simulator settings.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        SimulatedClientBuilder {
            config: config.clone(),
            autostart: true,
        }
        .build()
    }

    pub fn registry(&self) -> &Arc<OrderRegistry> {
        &self.registry
    }

    /// The simulator, for driving ticks by hand.
    pub fn simulator(&self) -> &LifecycleSimulator {
        &self.simulator
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Start the background simulator. No-op if it is already running.
    pub fn start(&self) -> Result<()> {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if handle.as_ref().is_some_and(SimulatorHandle::is_running) {
            return Ok(());
        }
        let spawned = self
            .simulator
            .clone()
            .spawn(self.config.tick_interval, self.config.rng())
            .map_err(|e| ExchangeError::Config(format!("failed to start simulator: {e}")))?;
        *handle = Some(spawned);
        Ok(())
    }

    /// Stop the background simulator and wait for it to exit.
    pub fn shutdown(&self) {
        let taken = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut handle) = taken {
            handle.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(SimulatorHandle::is_running)
    }
}

impl ExchangeClient for SimulatedClient {
    fn submit_limit_order(
        &self,
        market: &Market,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Result<OrderId> {
        let id = self.registry.submit(side, market.clone(), quantity, price)?;
        info!(
            "Paper {side} {market}: {quantity} x {price} = {}",
            quantity * price
        );
        Ok(id)
    }

    fn cancel_order(&self, id: OrderId) -> Result<()> {
        self.registry.cancel(id)?;
        Ok(())
    }

    fn get_order(&self, id: OrderId) -> Result<OrderView> {
        Ok(project_order(&self.registry, id)?)
    }

    fn list_open_orders(&self, market: Option<&Market>) -> Result<Vec<OpenOrderView>> {
        Ok(project_open(&self.registry, market))
    }

    fn order_history(&self, market: Option<&Market>) -> Result<Vec<OrderHistoryView>> {
        Ok(project_history(&self.registry, market))
    }

    fn get_balances(&self) -> Result<Vec<Balance>> {
        Err(ExchangeError::Unsupported("get_balances"))
    }
}

impl Drop for SimulatedClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}
