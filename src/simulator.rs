//! Background lifecycle simulation for paper orders.
//!
//! Every tick the simulator snapshots the open orders, rolls an outcome for
//! each from the [`FillTable`], and applies it under the registry lock. A
//! failure on one order is logged and skipped; the scan and the next tick
//! always go ahead.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Timestamp;
use crate::error::Result;
use crate::fill_model::{FillTable, Outcome, partial_remaining};
use crate::order::SimOrder;
use crate::registry::OrderRegistry;

/// Default interval between two scans.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(20);

/// How the background task is scheduled and seeded.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    pub tick_interval: Duration,
    /// Fixed seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
    pub table: FillTable,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
            table: FillTable::default(),
        }
    }
}

impl SimulatorConfig {
    /// Random source for the background task.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Counts from one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub scanned: usize,
    pub fulfilled: usize,
    pub partly_filled: usize,
    pub untouched: usize,
    /// Orders that could not be updated, e.g. cancelled mid-scan.
    pub skipped: usize,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned={} fulfilled={} partly_filled={} untouched={} skipped={}",
            self.scanned, self.fulfilled, self.partly_filled, self.untouched, self.skipped
        )
    }
}

/// Drives open orders in a registry towards fills.
#[derive(Clone)]
pub struct LifecycleSimulator {
    registry: Arc<OrderRegistry>,
    table: FillTable,
}

impl LifecycleSimulator {
    pub fn new(registry: Arc<OrderRegistry>, table: FillTable) -> Self {
        Self { registry, table }
    }

    pub fn registry(&self) -> &Arc<OrderRegistry> {
        &self.registry
    }

    pub fn table(&self) -> &FillTable {
        &self.table
    }

    /// Run one scan as of `now`.
    pub fn tick_at<R: Rng + ?Sized>(&self, now: Timestamp, rng: &mut R) -> TickReport {
        let open = self.registry.open_snapshot();
        let mut report = TickReport {
            scanned: open.len(),
            ..TickReport::default()
        };

        for order in &open {
            match self.step(order, now, rng) {
                Ok(Outcome::Fulfill) => report.fulfilled += 1,
                Ok(Outcome::PartlyFill) => report.partly_filled += 1,
                Ok(Outcome::Nothing) => report.untouched += 1,
                Err(e) => {
                    warn!("Skipping order {} this tick: {e}", order.id);
                    report.skipped += 1;
                }
            }
        }

        debug!("Tick at {now}: {report}");
        report
    }

    /// Run one scan as of the current wall-clock time.
    pub fn tick<R: Rng + ?Sized>(&self, rng: &mut R) -> TickReport {
        self.tick_at(Utc::now(), rng)
    }

    fn step<R: Rng + ?Sized>(
        &self,
        order: &SimOrder,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<Outcome> {
        let outcome = self.table.decide(order.side, order.age_secs(now), rng);
        match outcome {
            Outcome::Nothing => {}
            Outcome::Fulfill => {
                self.registry.update_open(order.id, |o| o.fulfill(now))??;
                debug!("Fulfilled {} {} (id={})", order.side, order.market, order.id);
            }
            Outcome::PartlyFill => {
                let remaining = self.registry.update_open(order.id, |o| {
                    let remaining = partial_remaining(o.quantity_remaining, o.quantity, rng);
                    o.partly_fill(remaining).map(|()| o.quantity_remaining)
                })??;
                debug!(
                    "Partly filled {} {} remaining={remaining:.8} (id={})",
                    order.side, order.market, order.id
                );
            }
        }
        Ok(outcome)
    }

    /// Start scanning on a dedicated thread, one tick per `interval`.
    ///
    /// The first scan happens one interval after the call. The thread runs
    /// until the returned handle is stopped or dropped.
    pub fn spawn<R>(self, interval: Duration, mut rng: R) -> std::io::Result<SimulatorHandle>
    where
        R: Rng + Send + 'static,
    {
        let (stop_tx, stop_rx): (Sender<()>, Receiver<()>) = bounded(1);
        let thread = thread::Builder::new()
            .name("papertrex-simulator".into())
            .spawn(move || {
                info!("Order lifecycle simulator started (tick={interval:?})");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            self.tick(&mut rng);
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("Order lifecycle simulator stopped");
            })?;

        Ok(SimulatorHandle {
            stop_tx,
            thread: Some(thread),
        })
    }
}

/// Owns the background simulator thread.
pub struct SimulatorHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl SimulatorHandle {
    /// Signal the thread and wait for the current tick to finish.
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.stop_tx.try_send(());
            if thread.join().is_err() {
                warn!("Order lifecycle simulator thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SimulatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
