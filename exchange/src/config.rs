//! TOML configuration loading, validation, and client selection.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use papertrex::{FillTable, SimulatorConfig};
use serde::Deserialize;

use crate::ExchangeClient;
use crate::error::{ExchangeError, Result};
use crate::paper::SimulatedClient;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub simulator: SimulatorSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub mode: Mode,
    #[serde(default = "default_account_name")]
    pub account_name: String,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_sec: usize,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_account_name() -> String {
    "default".into()
}
fn default_rate_limit() -> usize {
    5
}
fn default_timeout() -> u64 {
    15
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Simulated orders, nothing sent to the exchange.
    Paper,
    Live,
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorSection {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval() -> u64 {
    20
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
            seed: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ExchangeError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        contents.parse()
    }

    /// Validate config invariants.
    pub fn validate(&self) -> Result<()> {
        if self.client.account_name.is_empty() {
            return Err(ExchangeError::Config("account_name must not be empty".into()));
        }
        if self.client.rate_limit_per_sec == 0 {
            return Err(ExchangeError::Config("rate_limit_per_sec must be > 0".into()));
        }
        if self.client.timeout_secs == 0 {
            return Err(ExchangeError::Config("timeout_secs must be > 0".into()));
        }
        if self.simulator.tick_interval_secs == 0 {
            return Err(ExchangeError::Config("tick_interval_secs must be > 0".into()));
        }
        if self.client.mode == Mode::Live {
            match &self.credentials {
                Some(c) if !c.api_key.is_empty() && !c.secret.is_empty() => {}
                _ => {
                    return Err(ExchangeError::Config(
                        "live mode requires [credentials] api_key and secret".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }

    /// Settings for the paper-mode simulator, with the default fill table.
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            tick_interval: Duration::from_secs(self.simulator.tick_interval_secs),
            seed: self.simulator.seed,
            table: FillTable::default(),
        }
    }
}

impl FromStr for Config {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// Construct the client the configuration selects.
pub fn connect(config: &Config) -> Result<Box<dyn ExchangeClient>> {
    match config.client.mode {
        Mode::Paper => {
            info!(
                "Connecting account '{}' in paper mode",
                config.client.account_name
            );
            Ok(Box::new(SimulatedClient::from_config(
                &config.simulator_config(),
            )?))
        }
        Mode::Live => connect_live(config),
    }
}

#[cfg(feature = "bittrex")]
fn connect_live(config: &Config) -> Result<Box<dyn ExchangeClient>> {
    let creds = config
        .credentials
        .as_ref()
        .ok_or_else(|| ExchangeError::Config("missing [credentials]".into()))?;
    info!(
        "Connecting account '{}' to Bittrex",
        config.client.account_name
    );
    let client = crate::bittrex::BittrexClient::new(
        &creds.api_key,
        &creds.secret,
        config.client.rate_limit_per_sec,
        config.timeout(),
    )?;
    Ok(Box::new(client))
}

#[cfg(not(feature = "bittrex"))]
fn connect_live(_config: &Config) -> Result<Box<dyn ExchangeClient>> {
    Err(ExchangeError::Unsupported(
        "live trading without the `bittrex` feature",
    ))
}
