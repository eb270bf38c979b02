//! Paper trading through the `ExchangeClient` trait object, the way an
//! application built on `connect` would use it.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use papertrex::{FillTable, Odds};
use papertrex_exchange::config::{self, Config};
use papertrex_exchange::paper::SimulatedClient;
use papertrex_exchange::{ExchangeClient, ExchangeError, Market, OrderSide};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn market(name: &str) -> Market {
    Market::new(name).unwrap()
}

fn idle() -> SimulatedClient {
    SimulatedClient::builder().seed(1).autostart(false).build().unwrap()
}

// ============================================================================
// Trait-level scenarios
// ============================================================================

#[test]
fn open_listing_filters_by_market() {
    let client = idle();
    let dyn_client: &dyn ExchangeClient = &client;

    let eth = dyn_client
        .submit_limit_order(&market("BTC-ETH"), OrderSide::LimitBuy, 1.0, 0.05)
        .unwrap();
    dyn_client
        .submit_limit_order(&market("BTC-LTC"), OrderSide::LimitBuy, 1.0, 0.01)
        .unwrap();
    dyn_client
        .submit_limit_order(&market("USDT-BTC"), OrderSide::LimitSell, 0.1, 9000.0)
        .unwrap();

    let open = dyn_client.list_open_orders(Some(&market("BTC-ETH"))).unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].order_uuid, eth);
    assert_eq!(dyn_client.list_open_orders(None).unwrap().len(), 3);
}

#[test]
fn cancel_shows_up_in_history() {
    let client = idle();
    let id = client
        .submit_limit_order(&market("BTC-ETH"), OrderSide::LimitSell, 4.0, 0.25)
        .unwrap();
    client.cancel_order(id).unwrap();

    let order = client.get_order(id).unwrap();
    assert!(!order.is_open);
    assert!(order.cancel_initiated);
    assert_eq!(order.price, 1.0);
    assert_eq!(order.price_per_unit, Some(0.25));

    let history = client.order_history(None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].order_uuid, id);
    assert!(client.list_open_orders(None).unwrap().is_empty());
}

#[test]
fn unknown_order_is_not_found() {
    let client = idle();
    let stray = papertrex::OrderId::random();
    assert!(matches!(
        client.get_order(stray),
        Err(ExchangeError::NotFound(_))
    ));
    assert!(matches!(
        client.cancel_order(stray),
        Err(ExchangeError::NotFound(_))
    ));
}

#[test]
fn manual_ticks_are_reproducible() {
    let run = || {
        let client = SimulatedClient::builder()
            .fill_table(FillTable::uniform(Odds::new(30, 60)))
            .autostart(false)
            .build()
            .unwrap();
        for i in 0..20 {
            client
                .submit_limit_order(&market("BTC-ETH"), OrderSide::LimitBuy, 10.0, 1.0 + i as f64)
                .unwrap();
        }
        let mut rng = StdRng::seed_from_u64(99);
        let mut reports = Vec::new();
        for _ in 0..3 {
            reports.push(client.simulator().tick(&mut rng));
        }
        reports
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Background simulator
// ============================================================================

#[test]
fn background_ticks_fill_orders() {
    let client = SimulatedClient::builder()
        .tick_interval(Duration::from_millis(20))
        .fill_table(FillTable::uniform(Odds::new(100, 0)))
        .seed(5)
        .build()
        .unwrap();
    let id = client
        .submit_limit_order(&market("BTC-ETH"), OrderSide::LimitBuy, 3.0, 2.0)
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while client.get_order(id).unwrap().is_open {
        assert!(Instant::now() < deadline, "order never filled");
        thread::sleep(Duration::from_millis(10));
    }

    let order = client.get_order(id).unwrap();
    assert_eq!(order.quantity_remaining, 0.0);
    assert_eq!(order.price, 6.0);
    client.shutdown();
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn connect_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[client]
mode = "paper"
account_name = "scratch"

[simulator]
tick_interval_secs = 1
seed = 3
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.client.account_name, "scratch");

    let client = config::connect(&config).unwrap();
    let id = client
        .submit_limit_order(&market("BTC-ETH"), OrderSide::LimitBuy, 1.0, 1.0)
        .unwrap();
    assert_eq!(client.get_order(id).unwrap().order_uuid, id);
    assert!(matches!(
        client.get_balances(),
        Err(ExchangeError::Unsupported(_))
    ));
}

#[test]
fn missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        Config::load(&path),
        Err(ExchangeError::ConfigRead { .. })
    ));
}

#[test]
fn invalid_config_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[client]\nmode = \"paper\"\nrate_limit_per_sec = 0").unwrap();
    assert!(matches!(
        Config::load(file.path()),
        Err(ExchangeError::Config(_))
    ));
}
