mod common;

use common::MockApi;
use tunnelflow_cloudflare::{tunnel_cname, ApiClient, DnsManager};

fn records_body(content: &str) -> String {
    format!(
        r#"{{"success": true, "result": [{{"id": "r1", "name": "app.example.com", "type": "CNAME", "content": "{}", "ttl": 1, "proxied": true}}], "errors": []}}"#,
        content
    )
}

const WRITTEN: &str = r#"{"success": true, "result": {"id": "r1", "name": "app.example.com", "type": "CNAME", "content": "t-new.cfargotunnel.com", "ttl": 1, "proxied": true}, "errors": []}"#;

/// An already-correct record produces zero write calls.
#[tokio::test]
async fn correct_record_is_left_alone() {
    let target = tunnel_cname("t-new");
    let api_server = MockApi::serve(&[(
        "GET /zones/z1/dns_records?type=CNAME&name=app.example.com",
        &records_body(&target),
    )])
    .await;
    let api = ApiClient::with_base_url("token", api_server.base_url.as_str());
    let dns = DnsManager::new(&api, "z1");

    dns.ensure_cname("app.example.com", &target).await.unwrap();

    assert_eq!(api_server.count("PUT"), 0);
    assert_eq!(api_server.count("POST"), 0);
}

/// A stale record is updated in place, exactly once, never created anew.
#[tokio::test]
async fn stale_record_is_updated_not_created() {
    let api_server = MockApi::serve(&[
        (
            "GET /zones/z1/dns_records?type=CNAME&name=app.example.com",
            &records_body("t-old.cfargotunnel.com"),
        ),
        ("PUT /zones/z1/dns_records/r1", WRITTEN),
    ])
    .await;
    let api = ApiClient::with_base_url("token", api_server.base_url.as_str());
    let dns = DnsManager::new(&api, "z1");

    dns.ensure_cname("app.example.com", &tunnel_cname("t-new"))
        .await
        .unwrap();

    assert_eq!(api_server.count("PUT"), 1);
    assert_eq!(api_server.count("POST"), 0);
}

/// No record yet: exactly one create.
#[tokio::test]
async fn missing_record_is_created() {
    let api_server = MockApi::serve(&[
        (
            "GET /zones/z1/dns_records?type=CNAME&name=app.example.com",
            r#"{"success": true, "result": [], "errors": []}"#,
        ),
        ("POST /zones/z1/dns_records", WRITTEN),
    ])
    .await;
    let api = ApiClient::with_base_url("token", api_server.base_url.as_str());
    let dns = DnsManager::new(&api, "z1");

    dns.ensure_cname("app.example.com", &tunnel_cname("t-new"))
        .await
        .unwrap();

    assert_eq!(api_server.count("POST"), 1);
    assert_eq!(api_server.count("PUT"), 0);
}
