#![allow(clippy::unwrap_used)]
// End-to-end discovery against a mocked Imou cloud.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use imou_api::{AccountStatus, Credentials, DataCenter, ImouClient};
use imou_core::{CoreError, DeviceStore, DiscoveryResult, MemoryStore, collect_devices, scan};

async fn setup() -> (MockServer, ImouClient) {
    let server = MockServer::start().await;
    let credentials = Arc::new(Credentials::new(
        "lc_test_app",
        SecretString::from("s3cr3t".to_owned()),
        DataCenter::Custom(Url::parse(&server.uri()).unwrap()),
    ));

    Mock::given(method("POST"))
        .and(path("/accessToken"))
        .respond_with(ok(json!({ "accessToken": "At_scan" })))
        .expect(1)
        .mount(&server)
        .await;

    (server, ImouClient::with_client(reqwest::Client::new(), credentials))
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "resp",
        "result": { "code": "0", "msg": "ok", "data": data }
    }))
}

fn page(range: std::ops::Range<usize>) -> Value {
    let devices: Vec<Value> = range
        .map(|n| {
            json!({
                "deviceId": format!("DEV{n:04}"),
                "name": format!("Camera {n}"),
                "deviceModel": "IPC-A22",
                "ability": "WLAN,MT",
                "channelNum": 1,
                "channels": [{ "channelId": 0, "channelName": format!("Camera {n}") }]
            })
        })
        .collect();
    json!({ "count": devices.len(), "devices": devices })
}

async fn mount_page(server: &MockServer, range: &str, data: Value) {
    Mock::given(method("POST"))
        .and(path("/deviceList"))
        .and(body_partial_json(json!({ "params": { "queryRange": range } })))
        .respond_with(ok(data))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collect_walks_all_pages() {
    let (server, client) = setup().await;
    mount_page(&server, "1-100", page(0..100)).await;
    mount_page(&server, "101-200", page(100..200)).await;
    mount_page(&server, "201-300", page(200..240)).await;

    let devices = collect_devices(&client).await.unwrap();

    assert_eq!(devices.len(), 240);
    assert_eq!(devices[150].device_id, "DEV0150");
    assert_eq!(devices[150].channels[0].channel_id, "0");
}

#[tokio::test]
async fn test_scan_populates_store() {
    let (server, client) = setup().await;
    mount_page(&server, "1-100", page(0..2)).await;
    let store = MemoryStore::new();

    let result = scan(&client, &store).await.unwrap();

    assert_eq!(
        result,
        DiscoveryResult {
            new_count: 2,
            updated_count: 0,
            existing_count: 0,
        }
    );
    let record = store.get("DEV0001").unwrap();
    assert_eq!(record.image_identifier, "IPC-A22.png");
    assert!(record.has_capability("MotionDetect"));
    assert!(record.configuration_errors().is_empty());
}

#[tokio::test]
async fn test_failed_page_reports_account_error() {
    let (server, client) = setup().await;
    mount_page(&server, "1-100", page(0..100)).await;

    Mock::given(method("POST"))
        .and(path("/deviceList"))
        .and(body_partial_json(json!({ "params": { "queryRange": "101-200" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "resp",
            "result": { "code": "SN1001", "msg": "system busy" }
        })))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let err = scan(&client, &store).await.unwrap_err();

    assert!(matches!(err, CoreError::Api { .. }));
    assert_eq!(err.code(), Some("SN1001"));
    assert_eq!(store.len(), 100);
    assert!(matches!(
        client.current_status(),
        AccountStatus::Error { code: Some(ref c), .. } if c == "SN1001"
    ));
}
