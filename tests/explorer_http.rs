//! HTTP Adapter Tests - Explorer Client and Webhook Endpoints
//!
//! Runs the real reqwest-backed adapters against a local mockito server.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

use btc_balance_monitor::adapters::explorer::{EsploraClient, EsploraClientConfig};
use btc_balance_monitor::adapters::notify::UrlEndpointFactory;
use btc_balance_monitor::domain::{AddressDescriptor, Balance};
use btc_balance_monitor::error::{DeliveryError, FetchError};
use btc_balance_monitor::ports::{BalanceSource, EndpointFactory, NotificationEndpoint};
use btc_balance_monitor::usecases::{AddressMonitor, MonitorSettings, NotificationDispatcher};

const ADDRESS: &str = "bc1qtestaddress";

fn explorer(server: &ServerGuard) -> EsploraClient {
    EsploraClient::new(EsploraClientConfig {
        base_url: server.url(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

async fn mock_stats(server: &mut ServerGuard, funded: u64, spent: u64) -> Mock {
    server
        .mock("GET", format!("/address/{ADDRESS}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "address": ADDRESS,
                "chain_stats": {
                    "funded_txo_count": 2,
                    "funded_txo_sum": funded,
                    "spent_txo_count": 1,
                    "spent_txo_sum": spent,
                    "tx_count": 3
                },
                "mempool_stats": {
                    "funded_txo_count": 0,
                    "funded_txo_sum": 0,
                    "spent_txo_count": 0,
                    "spent_txo_sum": 0,
                    "tx_count": 0
                }
            })
            .to_string(),
        )
        .create_async()
        .await
}

////////////////////////////////////////////////////////////
// explorer client
////////////////////////////////////////////////////////////

#[tokio::test]
async fn test_balance_is_funded_minus_spent() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_stats(&mut server, 150_000_000, 50_000_000).await;

    let balance = explorer(&server).get_balance(ADDRESS).await.unwrap();

    assert_eq!(balance, Balance::from_sats(100_000_000));
    assert_eq!(balance.to_string(), "1.00000000");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unconfirmed_activity_is_ignored() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", format!("/address/{ADDRESS}").as_str())
        .with_status(200)
        .with_body(
            json!({
                "chain_stats": { "funded_txo_sum": 1000, "spent_txo_sum": 0 },
                "mempool_stats": { "funded_txo_sum": 999_999, "spent_txo_sum": 0 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let balance = explorer(&server).get_balance(ADDRESS).await.unwrap();

    assert_eq!(balance.sats(), 1000);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", format!("/address/{ADDRESS}").as_str())
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = explorer(&server).get_balance(ADDRESS).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500 }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_address_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/address/not-an-address")
        .with_status(400)
        .with_body("Invalid Bitcoin address")
        .create_async()
        .await;

    let err = explorer(&server)
        .get_balance("not-an-address")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "explorer returned HTTP 400");
}

#[tokio::test]
async fn test_missing_fields_are_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/address/{ADDRESS}").as_str())
        .with_status(200)
        .with_body(r#"{"chain_stats":{"tx_count":1}}"#)
        .create_async()
        .await;

    let err = explorer(&server).get_balance(ADDRESS).await.unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/address/{ADDRESS}").as_str())
        .with_status(200)
        .with_body("<html>rate limited</html>")
        .create_async()
        .await;

    let err = explorer(&server).get_balance(ADDRESS).await.unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_overspent_ledger_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_stats(&mut server, 10, 20).await;

    let err = explorer(&server).get_balance(ADDRESS).await.unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse(msg) if msg.contains("exceeds")));
}

#[tokio::test]
async fn test_unreachable_explorer() {
    let client = EsploraClient::new(EsploraClientConfig {
        base_url: "http://127.0.0.1:1/api".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = client.get_balance(ADDRESS).await.unwrap_err();

    assert!(matches!(err, FetchError::Request(_)));
}

#[tokio::test]
async fn test_stalled_explorer_times_out() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/address/{ADDRESS}").as_str())
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(2));
            w.write_all(br#"{"chain_stats":{"funded_txo_sum":1,"spent_txo_sum":0}}"#)
        })
        .create_async()
        .await;

    let client = EsploraClient::new(EsploraClientConfig {
        base_url: server.url(),
        timeout: Duration::from_millis(200),
    })
    .unwrap();

    let started = std::time::Instant::now();
    let err = client.get_balance(ADDRESS).await.unwrap_err();

    assert!(matches!(err, FetchError::Timeout), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(2));
}

////////////////////////////////////////////////////////////
// notification endpoints
////////////////////////////////////////////////////////////

#[tokio::test]
async fn test_json_webhook_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hooks/btc")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "version": "1.0",
            "title": "Funds Received",
            "message": "body text",
            "type": "info"
        })))
        .with_status(200)
        .create_async()
        .await;

    let factory = UrlEndpointFactory::with_default_client().unwrap();
    let endpoint = factory
        .create(&format!("json://{}/hooks/btc", server.host_with_port()))
        .unwrap();

    endpoint.deliver("Funds Received", "body text").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_webhook_rejection_is_delivery_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/hook")
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let factory = UrlEndpointFactory::with_default_client().unwrap();
    let endpoint = factory
        .create(&format!("json://{}/hook", server.host_with_port()))
        .unwrap();

    let err = endpoint.deliver("T", "B").await.unwrap_err();
    assert!(matches!(
        err,
        DeliveryError::Status { status: 403, ref body } if body == "forbidden"
    ));
}

#[tokio::test]
async fn test_unreachable_webhook_error_hides_token() {
    let factory = UrlEndpointFactory::with_default_client().unwrap();
    let endpoint = factory
        .create("json://127.0.0.1:1/hooks/SUPERSECRETTOKEN")
        .unwrap();

    let err = endpoint.deliver("T", "B").await.unwrap_err();

    assert!(matches!(err, DeliveryError::Request(_)));
    assert!(!err.to_string().contains("SUPERSECRETTOKEN"));
}

#[tokio::test]
async fn test_ntfy_title_header_and_text_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/wallets")
        .match_header("Title", "Balance Decreased")
        .match_body("Now 1.00000000 BTC")
        .with_status(200)
        .create_async()
        .await;

    let factory = UrlEndpointFactory::with_default_client().unwrap();
    let endpoint = factory
        .create(&format!("ntfy://{}/wallets", server.host_with_port()))
        .unwrap();

    endpoint
        .deliver("Balance Decreased", "Now 1.00000000 BTC")
        .await
        .unwrap();
    mock.assert_async().await;
}

////////////////////////////////////////////////////////////
// end to end
////////////////////////////////////////////////////////////

#[tokio::test]
async fn test_monitor_over_http() {
    let mut explorer_server = mockito::Server::new_async().await;
    let mut hook_server = mockito::Server::new_async().await;

    let hook = hook_server
        .mock("POST", "/notify")
        .match_body(Matcher::PartialJson(json!({ "title": "Funds Received" })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let factory = Arc::new(UrlEndpointFactory::with_default_client().unwrap());
    let dispatcher = NotificationDispatcher::from_urls(
        factory,
        [format!("json://{}/notify", hook_server.host_with_port())],
    );
    let settings = MonitorSettings {
        addresses: vec![AddressDescriptor::titled(ADDRESS, "Cold storage")],
        interval: Duration::from_secs(1),
        notify_errors: false,
    };
    let mut monitor =
        AddressMonitor::new(Arc::new(explorer(&explorer_server)), dispatcher, settings).unwrap();

    let first = mock_stats(&mut explorer_server, 100_000_000, 0).await;
    monitor.run_round().await;
    first.remove_async().await;

    let second = mock_stats(&mut explorer_server, 150_000_000, 0).await;
    let summary = monitor.run_round().await;
    second.assert_async().await;

    assert_eq!(summary.notifications, 1);
    assert_eq!(monitor.state().get(ADDRESS), Some(Balance::from_sats(150_000_000)));
    hook.assert_async().await;
}
