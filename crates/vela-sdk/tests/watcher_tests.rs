//! Finality watcher tests for vela-sdk
//!
//! The watcher runs against a scripted MockTransport and a clock that only
//! advances when the watcher sleeps.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;
use vela_sdk::watcher::{Clock, TxStatus};
use vela_sdk::{envelope, MockTransport, ProxyProvider, SdkError, TransactionWatcher, Transport};

const HASH: &str = "2f0c9a1e";

/// Clock whose time moves only through `sleep`
#[derive(Clone)]
struct FakeClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl FakeClock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        *self.elapsed.lock().unwrap() += duration;
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Transport whose requests never complete
struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    async fn get(&self, _path: &str) -> Result<serde_json::Value, SdkError> {
        std::future::pending::<Result<serde_json::Value, SdkError>>().await
    }

    async fn post(
        &self,
        _path: &str,
        _body: serde_json::Value,
    ) -> Result<serde_json::Value, SdkError> {
        std::future::pending::<Result<serde_json::Value, SdkError>>().await
    }
}

fn set_transaction(transport: &MockTransport, tx: serde_json::Value) {
    transport.set_data(
        &format!("transaction/{}?withResults=true", HASH),
        json!({ "transaction": tx }),
    );
}

// ==================== Success ====================

#[tokio::test]
async fn test_pending_then_success() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["received", "pending", "success"]);
    set_transaction(&transport, json!({ "hash": HASH, "status": "success" }));
    let provider = ProxyProvider::with_transport(transport.clone());
    let clock = FakeClock::new();

    let tx = TransactionWatcher::new(&provider)
        .with_clock(clock.clone())
        .await_executed(HASH)
        .await
        .unwrap();

    assert_eq!(tx.status, "success");
    assert_eq!(
        transport.request_count(&format!("transaction/{}/status", HASH)),
        3
    );
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(1); 2]);
}

#[tokio::test]
async fn test_await_status_returns_class() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["partially-executed", "executed"]);
    let provider = ProxyProvider::with_transport(transport);

    let status = TransactionWatcher::new(&provider)
        .with_clock(FakeClock::new())
        .await_status(HASH)
        .await
        .unwrap();
    assert_eq!(status, TxStatus::Success);
}

// ==================== Timeout ====================

#[tokio::test]
async fn test_timeout_is_distinct_from_failure() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["pending"]);
    let provider = ProxyProvider::with_transport(transport);
    let clock = FakeClock::new();

    let err = TransactionWatcher::new(&provider)
        .with_clock(clock.clone())
        .await_executed(HASH)
        .await
        .unwrap_err();

    match err {
        SdkError::Timeout { hash, waited } => {
            assert_eq!(hash, HASH);
            assert_eq!(waited, Duration::from_secs(60));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(clock.sleeps().len(), 60);
}

#[tokio::test]
async fn test_custom_interval_and_timeout() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["pending"]);
    let provider = ProxyProvider::with_transport(transport);
    let clock = FakeClock::new();

    let err = TransactionWatcher::new(&provider)
        .with_clock(clock.clone())
        .with_poll_interval(Duration::from_millis(500))
        .with_timeout(Duration::from_secs(2))
        .await_status(HASH)
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Timeout { .. }));
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(500); 4]);
}

#[tokio::test]
async fn test_stalled_status_read_times_out() {
    let provider = ProxyProvider::with_transport(StalledTransport);

    let outcome = tokio::time::timeout(
        Duration::from_secs(3),
        TransactionWatcher::new(&provider)
            .with_timeout(Duration::from_millis(100))
            .await_status(HASH),
    )
    .await
    .expect("watcher did not honor its own timeout");

    match outcome {
        Err(SdkError::Timeout { hash, waited }) => {
            assert_eq!(hash, HASH);
            assert!(waited >= Duration::from_millis(100));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stalled_read_uses_remaining_budget() {
    let provider = ProxyProvider::with_transport(StalledTransport);
    let clock = FakeClock::new();

    let err = TransactionWatcher::new(&provider)
        .with_clock(clock.clone())
        .await_executed(HASH)
        .await
        .unwrap_err();

    match err {
        SdkError::Timeout { waited, .. } => assert_eq!(waited, Duration::from_secs(60)),
        other => panic!("expected timeout, got {:?}", other),
    }
    // the whole budget went to the first read, no poll interval was slept
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(60)]);
}

#[tokio::test]
async fn test_unknown_status_keeps_polling() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["rewardsPaid", "success"]);
    set_transaction(&transport, json!({ "status": "success" }));
    let provider = ProxyProvider::with_transport(transport);

    let tx = TransactionWatcher::new(&provider)
        .with_clock(FakeClock::new())
        .await_executed(HASH)
        .await
        .unwrap();
    assert_eq!(tx.hash, HASH);
}

// ==================== Failure outcomes ====================

#[tokio::test]
async fn test_failed_status() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["pending", "fail"]);
    set_transaction(&transport, json!({ "status": "fail" }));
    let provider = ProxyProvider::with_transport(transport);

    let err = TransactionWatcher::new(&provider)
        .with_clock(FakeClock::new())
        .await_executed(HASH)
        .await
        .unwrap_err();
    match err {
        SdkError::TxFailed { hash, status } => {
            assert_eq!(hash, HASH);
            assert_eq!(status, "fail");
        }
        other => panic!("expected failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_status() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["invalid"]);
    set_transaction(&transport, json!({ "status": "invalid" }));
    let provider = ProxyProvider::with_transport(transport);

    let err = TransactionWatcher::new(&provider)
        .with_clock(FakeClock::new())
        .await_executed(HASH)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::TxInvalid { .. }));
}

#[tokio::test]
async fn test_contract_error_overrides_success() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["success"]);
    set_transaction(
        &transport,
        json!({
            "status": "success",
            "smartContractResults": [
                { "hash": "aa", "data": "@6f6b", "returnMessage": "" },
                { "hash": "bb", "data": "@04", "returnMessage": "insufficient funds" }
            ]
        }),
    );
    let provider = ProxyProvider::with_transport(transport);

    let err = TransactionWatcher::new(&provider)
        .with_clock(FakeClock::new())
        .await_executed(HASH)
        .await
        .unwrap_err();
    match err {
        SdkError::ContractError { message, .. } => assert_eq!(message, "insufficient funds"),
        other => panic!("expected contract error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_contract_error_from_signal_error_event() {
    let transport = MockTransport::new();
    transport.push_statuses(HASH, &["success"]);
    set_transaction(
        &transport,
        json!({
            "status": "success",
            "logs": { "events": [
                {
                    "identifier": "signalError",
                    "address": "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th",
                    "topics": ["", "d3JvbmcgYW1vdW50"]
                }
            ]}
        }),
    );
    let provider = ProxyProvider::with_transport(transport);

    let err = TransactionWatcher::new(&provider)
        .with_clock(FakeClock::new())
        .await_executed(HASH)
        .await
        .unwrap_err();
    match err {
        SdkError::ContractError { message, .. } => assert_eq!(message, "wrong amount"),
        other => panic!("expected contract error, got {:?}", other),
    }
}

// ==================== Transient errors ====================

#[tokio::test]
async fn test_transient_read_errors_are_retried() {
    let transport = MockTransport::new();
    let path = format!("transaction/{}/status", HASH);
    transport.push_error(&path, "connection reset");
    transport.push_response(
        &path,
        json!({ "data": null, "error": "gateway busy", "code": "internal_issue" }),
    );
    transport.push_response(&path, envelope(json!({ "status": "success" })));
    set_transaction(&transport, json!({ "status": "success" }));
    let provider = ProxyProvider::with_transport(transport.clone());

    let tx = TransactionWatcher::new(&provider)
        .with_clock(FakeClock::new())
        .await_executed(HASH)
        .await
        .unwrap();
    assert_eq!(tx.status, "success");
    assert_eq!(transport.request_count(&path), 3);
    // nothing was resubmitted
    assert_eq!(transport.request_count("transaction/send"), 0);
}
