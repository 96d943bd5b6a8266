//! Client integration tests for vela-sdk
//!
//! Tests provider creation, envelope handling and endpoint wrappers.

use serde_json::json;
use vela_sdk::abi::{TypeValue, Value};
use vela_sdk::contract::{EndpointDefinition, SmartContract};
use vela_sdk::types::QueryRequest;
use vela_sdk::{Account, Address, ApiFlavor, BigUint, MockTransport, ProxyProvider, SdkError};

const ALICE: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";

// ==================== Provider Creation Tests ====================

#[tokio::test]
async fn test_provider_new_mock() {
    let provider = ProxyProvider::new_mock();
    let config = provider.network_config().await.unwrap();
    assert_eq!(config.chain_id, "D");
    assert_eq!(config.min_gas_price, 1_000_000_000);
    assert_eq!(config.gas_per_data_byte, 1_500);
}

#[tokio::test]
async fn test_network_config_fetched_once() {
    let transport = MockTransport::new();
    let provider = ProxyProvider::with_transport(transport.clone());

    for _ in 0..5 {
        provider.network_config().await.unwrap();
    }
    assert_eq!(transport.request_count("network/config"), 1);
}

#[tokio::test]
async fn test_failed_config_fetch_is_not_cached() {
    let transport = MockTransport::new();
    transport.push_error("network/config", "connection refused");
    transport.push_response(
        "network/config",
        vela_sdk::envelope(json!({ "config": {
            "erd_chain_id": "1",
            "erd_min_gas_price": 1_000_000_000u64,
            "erd_min_gas_limit": 50_000,
            "erd_gas_per_data_byte": 1_500,
            "erd_gas_price_modifier": "0.01",
            "erd_min_transaction_version": 1
        }})),
    );
    let provider = ProxyProvider::with_transport(transport);

    assert!(matches!(
        provider.network_config().await,
        Err(SdkError::Transport(_))
    ));
    assert_eq!(provider.network_config().await.unwrap().chain_id, "1");
}

// ==================== Envelope Tests ====================

#[tokio::test]
async fn test_gateway_error_code_surfaces_message() {
    let transport = MockTransport::new();
    transport.set_response(
        &format!("address/{}", ALICE),
        json!({ "data": null, "error": "cannot get account", "code": "internal_issue" }),
    );
    let provider = ProxyProvider::with_transport(transport);

    let err = provider
        .get_account(&Address::from_bech32(ALICE).unwrap())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Gateway error: internal_issue - cannot get account"
    );
}

#[tokio::test]
async fn test_unknown_path_is_http_error() {
    let provider = ProxyProvider::new_mock();
    let err = provider.get_transaction_status("missing").await.unwrap_err();
    assert!(matches!(err, SdkError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_api_flavor_account() {
    let transport = MockTransport::new();
    transport.set_response(
        &format!("address/{}", ALICE),
        json!({ "address": ALICE, "nonce": 4, "balance": "25", "assets": { "name": "Alice" } }),
    );
    let provider = ProxyProvider::with_transport(transport).with_flavor(ApiFlavor::Api);

    let account = provider
        .get_account(&Address::from_bech32(ALICE).unwrap())
        .await
        .unwrap();
    assert_eq!(account.nonce, 4);
    assert_eq!(account.balance, BigUint::from(25u8));
    assert_eq!(account.extra["assets"]["name"], "Alice");
}

// ==================== Account Tests ====================

#[tokio::test]
async fn test_account_sync_overwrites_nonce() {
    let transport = MockTransport::new();
    transport.set_data(
        &format!("address/{}", ALICE),
        json!({ "account": { "address": ALICE, "nonce": 42, "balance": "7" } }),
    );
    transport.set_data(
        &format!("address/{}/guardian-data", ALICE),
        json!({ "guardianData": { "guarded": false } }),
    );
    let provider = ProxyProvider::with_transport(transport);

    let mut account = Account::new(Address::from_bech32(ALICE).unwrap());
    account.nonce = 100;
    account.sync_from_network(&provider).await.unwrap();
    assert_eq!(account.nonce, 42);
    assert_eq!(account.balance.amount, BigUint::from(7u8));
    assert_eq!(account.guardian, None);
}

// ==================== Query Tests ====================

#[tokio::test]
async fn test_query_request_body() {
    let transport = MockTransport::new();
    transport.set_data(
        "vm-values/query",
        json!({ "data": { "returnData": [], "returnCode": "ok", "returnMessage": "" } }),
    );
    let provider = ProxyProvider::with_transport(transport.clone());
    let caller = Address::from_bech32(ALICE).unwrap();

    let request = QueryRequest {
        sc_address: Address::from_bytes([5u8; 32]),
        func_name: "getSum".to_string(),
        caller: Some(caller),
        value: None,
        args: vec!["0a".to_string()],
    };
    let response = provider.query_contract(&request).await.unwrap();
    assert!(!response.is_failure());

    let (_, body) = transport.requests().pop().unwrap();
    let body = body.unwrap();
    assert_eq!(body["funcName"], "getSum");
    assert_eq!(body["caller"], ALICE);
    assert_eq!(body["args"], json!(["0a"]));
    assert!(body.get("value").is_none());
}

#[tokio::test]
async fn test_contract_query_multi_results() {
    let transport = MockTransport::new();
    transport.set_data(
        "vm-values/query",
        json!({ "data": {
            "returnData": ["AQ==", "", "AAAAAw=="],
            "returnCode": "ok",
            "returnMessage": ""
        }}),
    );
    let provider = ProxyProvider::with_transport(transport);

    let contract = SmartContract::new(Address::from_bytes([5u8; 32])).with_endpoint(
        EndpointDefinition::new(
            "getState",
            vec![],
            vec![TypeValue::u8(), TypeValue::big_uint(), TypeValue::Bytes],
        ),
    );
    let value = contract.query(&provider, "getState", &[]).await.unwrap();
    assert_eq!(
        value,
        Value::Multi(vec![
            Value::u8(1),
            Value::big_uint(0u8),
            Value::Bytes(vec![0, 0, 0, 3]),
        ])
    );
}
