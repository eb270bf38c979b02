//! Throughput tests for the sliding-window limiter.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use papertrex_exchange::rate_limit::SlidingWindowLimiter;

#[test]
fn excess_calls_observe_a_wait() {
    let window = Duration::from_millis(200);
    let mut limiter = SlidingWindowLimiter::new(5, window).unwrap();

    let waits: Vec<Duration> = (0..8).map(|_| limiter.acquire()).collect();

    assert!(waits[..5].iter().all(|w| *w < Duration::from_millis(50)));
    assert!(waits[5] > Duration::ZERO, "sixth call should wait: {waits:?}");
}

#[test]
fn window_never_exceeds_cap() {
    let window = Duration::from_millis(100);
    let cap = 3;
    let limiter = Arc::new(Mutex::new(SlidingWindowLimiter::new(cap, window).unwrap()));
    let stamps = Arc::new(Mutex::new(Vec::new()));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let stamps = Arc::clone(&stamps);
            thread::spawn(move || {
                for _ in 0..3 {
                    let mut limiter = limiter.lock().unwrap();
                    limiter.acquire();
                    stamps.lock().unwrap().push(Instant::now());
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    let mut stamps = stamps.lock().unwrap().clone();
    stamps.sort();
    assert_eq!(stamps.len(), 12);
    // Any cap+1 consecutive calls span at least one window (less a little
    // slack for the time between acquire returning and the stamp).
    for pair in stamps.windows(cap + 1) {
        let span = pair[cap].duration_since(pair[0]);
        assert!(
            span + Duration::from_millis(10) >= window,
            "{} calls within {span:?}",
            cap + 1
        );
    }
}
