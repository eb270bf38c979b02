//! Bittrex v1.1 REST transport.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

use super::auth;
use super::types::{ApiResponse, decode};
use crate::error::{ExchangeError, Result};
use crate::rate_limit::SlidingWindowLimiter;

pub const DEFAULT_BASE_URL: &str = "https://bittrex.com";

/// Endpoint group; selects the URL prefix and whether the call is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Public,
    Market,
    Account,
}

impl Group {
    pub fn path(self) -> &'static str {
        match self {
            Group::Public => "public",
            Group::Market => "market",
            Group::Account => "account",
        }
    }

    pub fn is_private(self) -> bool {
        self != Group::Public
    }
}

/// Blocking Bittrex REST client.
///
/// Every call first waits on the rate limiter, then is bounded by the
/// request timeout. Private calls carry `apikey` and a strictly increasing
/// `nonce`, and are signed into the `apisign` header.
pub struct RestClient {
    client: Client,
    api_key: Zeroizing<String>,
    secret: Zeroizing<String>,
    base_url: String,
    last_nonce: AtomicU64,
    limiter: Mutex<SlidingWindowLimiter>,
}

impl RestClient {
    pub fn new(
        api_key: &str,
        secret: &str,
        rate_limit_per_sec: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let limiter = SlidingWindowLimiter::per_second(rate_limit_per_sec)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: Zeroizing::new(api_key.to_string()),
            secret: Zeroizing::new(secret.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            last_nonce: AtomicU64::new(0),
            limiter: Mutex::new(limiter),
        })
    }

    /// Point at another host (a proxy or a local stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Next nonce: wall-clock milliseconds, bumped past the previous one.
    fn next_nonce(&self) -> u64 {
        let now = current_timestamp_ms();
        let prev = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1)
    }

    /// Full request URL. Private groups get `apikey` and `nonce` appended.
    pub fn url(&self, group: Group, method: &str, params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}/api/v1.1/{}/{method}", self.base_url, group.path());
        let mut url = Url::parse_with_params(&base, params)
            .map_err(|e| ExchangeError::InvalidArgument(format!("bad url {base}: {e}")))?;
        if group.is_private() {
            let nonce = self.next_nonce().to_string();
            url.query_pairs_mut()
                .append_pair("apikey", &self.api_key)
                .append_pair("nonce", &nonce);
        }
        Ok(url)
    }

    /// Issue one GET and decode its envelope.
    pub fn get<T: DeserializeOwned>(
        &self,
        group: Group,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        self.limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .acquire();

        let url = self.url(group, method, params)?;
        debug!("Bittrex GET {group:?}/{method}");

        let mut request = self.client.get(url.as_str());
        if group.is_private() {
            request = request.header("apisign", auth::sign(url.as_str(), &self.secret));
        }

        let resp = request.send().map_err(|e| transport_error(method, e))?;
        let status = resp.status();
        let body = resp.text().map_err(|e| transport_error(method, e))?;

        if !status.is_success() {
            return Err(ExchangeError::Upstream(format!(
                "{method} returned {status}: {body}"
            )));
        }
        decode(method, &body)
    }
}

/// Error messages never include the request URL, which carries the api key.
fn transport_error(method: &str, e: reqwest::Error) -> ExchangeError {
    let e = e.without_url();
    if e.is_timeout() {
        ExchangeError::Timeout(format!("{method}: {e}"))
    } else {
        ExchangeError::Upstream(format!("{method} request failed: {e}"))
    }
}

/// Current timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
