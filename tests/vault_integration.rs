//! Integration tests for the backup run loop against a mock WiGLE API.
//!
//! Each test stands up a wiremock server, points a client at it via
//! `with_base_url`, and runs the full pagination-and-download loop into a
//! temp directory.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wigle_vault::{ApiError, VaultConfig, WigleClient, run_backup};

const TOKEN: &str = "QUlEdGVzdDp0b2tlbg==";
const CSV_BODY: &[u8] = b"ssid,lat,lon\nhome,1,2\n";

fn test_config() -> VaultConfig {
    VaultConfig {
        page_size: 100,
        throttle: Duration::ZERO,
    }
}

fn client_for(server: &MockServer) -> WigleClient {
    WigleClient::with_base_url(TOKEN, server.uri()).expect("valid token")
}

fn listing_body(ids: &[String]) -> serde_json::Value {
    json!({
        "success": true,
        "results": ids.iter().map(|id| json!({ "transid": id })).collect::<Vec<_>>(),
    })
}

/// Mounts a listing page mock for the given zero-based page index.
async fn mount_listing_page(server: &MockServer, page: usize, page_size: usize, ids: &[String]) {
    Mock::given(method("GET"))
        .and(path("/api/v2/file/transactions"))
        .and(query_param("pagestart", (page * page_size).to_string()))
        .and(query_param("pageend", ((page + 1) * page_size).to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(ids)))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a catch-all CSV download mock returning `CSV_BODY`.
async fn mount_csv_downloads(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex("^/api/v2/file/csv/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CSV_BODY))
        .mount(server)
        .await;
}

fn ids(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|n| format!("tx{n:05}")).collect()
}

#[tokio::test]
async fn test_single_short_page_downloads_everything() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_listing_page(&server, 0, 100, &ids(0..3)).await;
    mount_csv_downloads(&server).await;

    let stats = run_backup(&client_for(&server), out.path(), &test_config())
        .await
        .unwrap();

    assert_eq!(stats.found(), 3);
    assert_eq!(stats.downloaded(), 3);
    assert_eq!(stats.skipped(), 0);
    assert_eq!(stats.failed(), 0);
    assert_eq!(stats.total_bytes(), 3 * CSV_BODY.len() as u64);

    for id in ids(0..3) {
        let file = out.path().join(format!("{id}.csv"));
        assert_eq!(std::fs::read(&file).unwrap(), CSV_BODY);
    }
}

#[tokio::test]
async fn test_pagination_250_transactions_takes_three_requests() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // 250 transactions at page size 100: two full pages, then a short page
    // of 50 that must end the loop with no 4th request. Any request for
    // pagestart=300 would match no mock, fail the listing, and error the run.
    mount_listing_page(&server, 0, 100, &ids(0..100)).await;
    mount_listing_page(&server, 1, 100, &ids(100..200)).await;
    mount_listing_page(&server, 2, 100, &ids(200..250)).await;
    mount_csv_downloads(&server).await;

    let stats = run_backup(&client_for(&server), out.path(), &test_config())
        .await
        .unwrap();

    assert_eq!(stats.found(), 250);
    assert_eq!(stats.downloaded(), 250);
    assert_eq!(stats.failed(), 0);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 250);
}

#[tokio::test]
async fn test_exact_boundary_issues_one_final_empty_request() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // 200 transactions land exactly on the page boundary: both pages are
    // full, so the loop cannot tell the listing is done until a third
    // request comes back empty.
    mount_listing_page(&server, 0, 100, &ids(0..100)).await;
    mount_listing_page(&server, 1, 100, &ids(100..200)).await;
    mount_listing_page(&server, 2, 100, &[]).await;
    mount_csv_downloads(&server).await;

    let stats = run_backup(&client_for(&server), out.path(), &test_config())
        .await
        .unwrap();

    assert_eq!(stats.found(), 200);
    assert_eq!(stats.downloaded(), 200);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/file/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(&ids(0..3))))
        .expect(2)
        .mount(&server)
        .await;

    // Only the first run may download; the second must skip everything.
    Mock::given(method("GET"))
        .and(path_regex("^/api/v2/file/csv/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CSV_BODY))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = run_backup(&client, out.path(), &test_config()).await.unwrap();
    let second = run_backup(&client, out.path(), &test_config()).await.unwrap();

    assert_eq!(first.downloaded(), 3);
    assert_eq!(first.skipped(), 0);

    assert_eq!(second.downloaded(), 0);
    assert_eq!(second.skipped(), first.downloaded());
    assert_eq!(second.total_bytes(), first.total_bytes());

    let mut names: Vec<_> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    names.sort();
    assert_eq!(names.len(), 3);
}

#[tokio::test]
async fn test_existing_file_skipped_with_its_size_counted() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // T1 is already on disk with 500 bytes; only T2 may be fetched.
    std::fs::write(out.path().join("T1.csv"), vec![b'x'; 500]).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/file/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{"transid": "T1"}, {"transid": "T2"}],
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/csv/T1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CSV_BODY))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/csv/T2"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CSV_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let stats = run_backup(&client_for(&server), out.path(), &test_config())
        .await
        .unwrap();

    assert_eq!(stats.found(), 2);
    assert_eq!(stats.skipped(), 1);
    assert_eq!(stats.downloaded(), 1);
    assert_eq!(stats.total_bytes(), 500 + CSV_BODY.len() as u64);

    // The pre-existing file is left untouched.
    assert_eq!(std::fs::metadata(out.path().join("T1.csv")).unwrap().len(), 500);
}

#[tokio::test]
async fn test_single_download_failure_does_not_abort_run() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/file/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{"transid": "a"}, {"transid": "b"}, {"transid": "c"}],
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/csv/b"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex("^/api/v2/file/csv/[ac]$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CSV_BODY))
        .mount(&server)
        .await;

    let stats = run_backup(&client_for(&server), out.path(), &test_config())
        .await
        .unwrap();

    assert_eq!(stats.downloaded(), 2);
    assert_eq!(stats.failed(), 1);
    assert!(out.path().join("a.csv").exists());
    assert!(!out.path().join("b.csv").exists());
    assert!(out.path().join("c.csv").exists());
}

#[tokio::test]
async fn test_listing_auth_failure_aborts_with_nothing_downloaded() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/file/transactions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = run_backup(&client_for(&server), out.path(), &test_config()).await;

    match result {
        Err(ApiError::AuthRequired { status: 401 }) => {}
        other => panic!("Expected AuthRequired 401, got: {other:?}"),
    }
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_listing_server_error_aborts_run() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/file/transactions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = run_backup(&client_for(&server), out.path(), &test_config()).await;
    assert!(matches!(result, Err(ApiError::HttpStatus { status: 503, .. })));
}

#[tokio::test]
async fn test_records_without_usable_id_are_ignored() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/file/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{"transid": "ok"}, {"transid": ""}, {"fileName": "orphan.csv"}],
        })))
        .mount(&server)
        .await;

    mount_csv_downloads(&server).await;

    let stats = run_backup(&client_for(&server), out.path(), &test_config())
        .await
        .unwrap();

    // Only the record with a non-empty id is counted or fetched.
    assert_eq!(stats.found(), 1);
    assert_eq!(stats.downloaded(), 1);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_empty_account_completes_with_zero_stats() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_listing_page(&server, 0, 100, &[]).await;

    let stats = run_backup(&client_for(&server), out.path(), &test_config())
        .await
        .unwrap();

    assert_eq!(stats.found(), 0);
    assert_eq!(stats.downloaded(), 0);
    assert_eq!(stats.total_bytes(), 0);
}
