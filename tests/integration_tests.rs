//! Integration tests using a mock HTTP server
//!
//! Tests the full end-to-end flow: JSON config → paginated fetch → flatten →
//! CSV tables + manifests.

use lever_extractor::{Config, Extractor};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(endpoints: &str) -> Config {
    Config::from_str(&format!(
        r#"{{
            "authentication": {{"token": "secret"}},
            "endpoints": {endpoints},
            "destination": {{"load_type": "incremental_load"}}
        }}"#
    ))
    .unwrap()
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

async fn mount_empty_children(server: &MockServer, opportunity_id: &str) {
    for child in ["resumes", "applications"] {
        Mock::given(method("GET"))
            .and(path(format!(
                "/opportunities/{opportunity_id}/{child}"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(server)
            .await;
    }
}

// ============================================================================
// End-to-End Extraction Tests
// ============================================================================

#[tokio::test]
async fn test_two_page_opportunities_run() {
    let mock_server = MockServer::start().await;

    // Page 1 returns cursor "c1", page 2 has no `next`
    Mock::given(method("GET"))
        .and(path("/opportunities"))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "a"}],
            "next": "c1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/opportunities"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "b"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_empty_children(&mock_server, "a").await;
    mount_empty_children(&mock_server, "b").await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["opportunities"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    let stats = extractor.run().await.unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.records_extracted, 2);
    assert_eq!(stats.child_requests, 4);

    let rows = read_csv(&out.path().join("opportunities.csv"));
    assert_eq!(rows[0], vec!["id"]);
    assert_eq!(rows[1], vec!["a"]);
    assert_eq!(rows[2], vec!["b"]);
}

#[tokio::test]
async fn test_schema_grows_across_records_with_padding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "x", "name": {"first": "A"}},
                {"id": "y", "name": {"first": "B", "last": "C"}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["postings"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    extractor.run().await.unwrap();

    let rows = read_csv(&out.path().join("postings.csv"));
    assert_eq!(rows[0], vec!["id", "name.first", "name.last"]);
    assert_eq!(rows[1], vec!["x", "A", ""]);
    assert_eq!(rows[2], vec!["y", "B", "C"]);
}

#[tokio::test]
async fn test_fan_out_links_children_to_parent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/opportunities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "opp-1", "stage": "offer"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/opportunities/opp-1/resumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "res-1", "file": {"name": "cv.pdf"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/opportunities/opp-1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "app-1"}, {"id": "app-2"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["opportunities"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    let stats = extractor.run().await.unwrap();

    assert_eq!(stats.records_extracted, 4);
    assert_eq!(stats.tables_finalized, 3);

    let resumes = read_csv(&out.path().join("resumes.csv"));
    let id_col = resumes[0].iter().position(|c| c == "id").unwrap();
    let parent_col = resumes[0]
        .iter()
        .position(|c| c == "opportunity_id")
        .unwrap();
    assert_eq!(resumes[1][id_col], "res-1");
    assert_eq!(resumes[1][parent_col], "opp-1");
    assert!(resumes[0].contains(&"file.name".to_string()));

    let applications = read_csv(&out.path().join("applications.csv"));
    let parent_col = applications[0]
        .iter()
        .position(|c| c == "opportunity_id")
        .unwrap();
    assert_eq!(applications[1][parent_col], "opp-1");
    assert_eq!(applications[2][parent_col], "opp-1");
}

#[tokio::test]
async fn test_multiple_endpoints_one_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p1", "state": "published"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/requisitions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "r1", "headcount": 3}]
        })))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["postings", "requisitions"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    let stats = extractor.run().await.unwrap();

    assert_eq!(stats.records_extracted, 2);
    assert_eq!(stats.tables_finalized, 2);
    assert!(out.path().join("postings.csv").exists());
    assert!(out.path().join("requisitions.csv").exists());

    let requisitions = read_csv(&out.path().join("requisitions.csv"));
    assert_eq!(requisitions[0], vec!["id", "headcount"]);
    assert_eq!(requisitions[1], vec!["r1", "3"]);
}

#[tokio::test]
async fn test_manifests_emitted_per_finalized_table() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p1"}]
        })))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["postings"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    extractor.run().await.unwrap();

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join("postings.csv.manifest")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["primary_key"], json!(["id"]));
    assert_eq!(manifest["incremental"], json!(true));
}

#[tokio::test]
async fn test_full_load_manifest_not_incremental() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p1"}]
        })))
        .mount(&mock_server)
        .await;

    let config = Config::from_str(
        r#"{
            "authentication": {"token": "secret"},
            "endpoints": ["postings"],
            "destination": {"load_type": "full_load"}
        }"#,
    )
    .unwrap();

    let out = TempDir::new().unwrap();
    let extractor =
        Extractor::with_base_url(config, out.path(), mock_server.uri()).unwrap();
    extractor.run().await.unwrap();

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join("postings.csv.manifest")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["incremental"], json!(false));
}

// ============================================================================
// Failure Semantics
// ============================================================================

#[tokio::test]
async fn test_fatal_error_aborts_without_finalizing_any_table() {
    let mock_server = MockServer::start().await;

    // First endpoint succeeds, second fails with a non-retryable status
    Mock::given(method("GET"))
        .and(path("/postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p1"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/requisitions"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["postings", "requisitions"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    let err = extractor.run().await.unwrap_err();
    assert!(err.to_string().contains("403"));

    // No table finalized, no staging left behind
    assert!(!out.path().join("postings.csv").exists());
    assert!(!out.path().join("requisitions.csv").exists());
    assert!(!out.path().join("postings.csv.staging").exists());
    assert!(!out.path().join("postings.csv.manifest").exists());
}

#[tokio::test]
async fn test_transient_failure_recovers_within_retry_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/postings"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/postings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p1"}]
        })))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["postings"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    let stats = extractor.run().await.unwrap();

    assert_eq!(stats.records_extracted, 1);
    assert!(out.path().join("postings.csv").exists());
}

#[tokio::test]
async fn test_child_fetch_failure_aborts_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/opportunities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "opp-1"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/opportunities/opp-1/resumes"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let extractor = Extractor::with_base_url(
        config_for(r#"["opportunities"]"#),
        out.path(),
        mock_server.uri(),
    )
    .unwrap();
    assert!(extractor.run().await.is_err());
    assert!(!out.path().join("opportunities.csv").exists());
}
