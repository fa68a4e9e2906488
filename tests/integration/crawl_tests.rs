//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full sweeps
//! end-to-end, down to the CSV report on disk. Two servers on different
//! ports stand in for the documentation site and an external site.

use docsweep::config::{parse_config, Config, Target};
use docsweep::crawler::run_crawl;
use docsweep::output::REPORT_COLUMNS;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing reports into `dir`
fn create_test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.concurrency = Some(4);
    config.retry.time_unit_ms = 1;
    config.output.directory = dir.to_path_buf();
    config
}

fn target(root_url: &str, label: &str) -> Target {
    Target {
        root_url: root_url.to_string(),
        label: label.to_string(),
    }
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Reads a report back, checking its header row
fn read_report(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open report");
    let headers = reader.headers().expect("Failed to read header").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), REPORT_COLUMNS.to_vec());

    reader
        .records()
        .map(|record| {
            record
                .expect("Failed to read record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_sweep_reports_single_broken_link() {
    let docs = MockServer::start().await;
    let external = MockServer::start().await;
    let root = format!("{}/v1/index.html", docs.uri());

    mount_page(
        &docs,
        "/v1/index.html",
        format!(
            r#"<html><body>
            <a href="a.html">A</a>
            <a href="{}/x">External</a>
            </body></html>"#,
            external.uri()
        ),
    )
    .await;

    // /v1/a.html is not mounted, so wiremock answers 404

    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"<a href="{}/y">Deeper</a>"#, external.uri())),
        )
        .expect(1)
        .mount(&external)
        .await;

    // Links on external pages are never followed
    Mock::given(method("GET"))
        .and(path("/y"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&external)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(temp_dir.path());

    let report = run_crawl(&config, &target(&root, "Stable"))
        .await
        .expect("Sweep failed");

    assert_eq!(report.broken_links.len(), 1);
    assert_eq!(report.statistics.links_discovered, 3);

    let report_path = temp_dir.path().join("Broken Links Stable.csv");
    assert!(report_path.exists());
    assert_eq!(
        read_report(&report_path),
        vec![vec![
            root.clone(),
            "404".to_string(),
            format!("{}/v1/a.html", docs.uri()),
        ]]
    );
}

#[tokio::test]
async fn test_sweep_follows_nested_pages_in_scope() {
    let docs = MockServer::start().await;
    let root = format!("{}/v1/index.html", docs.uri());

    mount_page(
        &docs,
        "/v1/index.html",
        r#"<a href="guide/index.html">Guide</a><a href="/v2/index.html">Other version</a>"#
            .to_string(),
    )
    .await;
    mount_page(
        &docs,
        "/v1/guide/index.html",
        r#"<a href="../index.html">Home</a><a href="gone.html">Gone</a>"#.to_string(),
    )
    .await;

    // Another version of the docs is checked, but its links are not followed
    Mock::given(method("GET"))
        .and(path("/v2/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="missing.html">M</a>"#))
        .expect(1)
        .mount(&docs)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(temp_dir.path());

    let report = run_crawl(&config, &target(&root, "Nested"))
        .await
        .expect("Sweep failed");

    let rows = read_report(&temp_dir.path().join("Broken Links Nested.csv"));
    assert_eq!(
        rows,
        vec![vec![
            format!("{}/v1/guide/index.html", docs.uri()),
            "404".to_string(),
            format!("{}/v1/guide/gone.html", docs.uri()),
        ]]
    );
    assert_eq!(report.statistics.pages_visited, 4);
}

#[tokio::test]
async fn test_method_not_allowed_is_not_reported() {
    let docs = MockServer::start().await;
    let api = MockServer::start().await;
    let root = format!("{}/v1/index.html", docs.uri());

    mount_page(
        &docs,
        "/v1/index.html",
        format!(r#"<a href="{}/endpoint">API</a>"#, api.uri()),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/endpoint"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&api)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(temp_dir.path());

    let report = run_crawl(&config, &target(&root, "Api"))
        .await
        .expect("Sweep failed");

    assert!(report.broken_links.is_empty());
    // An empty sweep still writes a header-only report
    assert!(read_report(&temp_dir.path().join("Broken Links Api.csv")).is_empty());
}

#[tokio::test]
async fn test_defensive_domain_tolerates_forbidden() {
    let docs = MockServer::start().await;
    let guarded = MockServer::start().await;
    let root = format!("{}/v1/index.html", docs.uri());

    mount_page(
        &docs,
        "/v1/index.html",
        format!(r#"<a href="{}/paper">Paper</a>"#, guarded.uri()),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/paper"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&guarded)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    // Without an allow-list entry the 403 is reported
    let config = create_test_config(temp_dir.path());
    let report = run_crawl(&config, &target(&root, "Strict"))
        .await
        .expect("Sweep failed");
    assert_eq!(report.broken_links.len(), 1);
    assert_eq!(report.broken_links[0].breakage.to_string(), "403");

    // Allow-listing the host turns it into a healthy outcome
    let mut config = create_test_config(temp_dir.path());
    config.policy.defensive_domains = vec!["127.0.0.1".to_string()];
    let report = run_crawl(&config, &target(&root, "Tolerant"))
        .await
        .expect("Sweep failed");
    assert!(report.broken_links.is_empty());
}

#[tokio::test]
async fn test_ignored_links_are_never_requested() {
    let docs = MockServer::start().await;
    let root = format!("{}/v1/index.html", docs.uri());

    mount_page(
        &docs,
        "/v1/index.html",
        r#"<a href="tutorial.ipynb">Notebook</a><a href="/v1/twitter-card.html">Card</a>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/v1/tutorial.ipynb"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&docs)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/twitter-card.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&docs)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(temp_dir.path());

    let report = run_crawl(&config, &target(&root, "Ignored"))
        .await
        .expect("Sweep failed");

    assert!(report.broken_links.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_is_reported_with_error_label() {
    let docs = MockServer::start().await;
    let root = format!("{}/v1/index.html", docs.uri());

    // Nothing listens on port 1
    mount_page(
        &docs,
        "/v1/index.html",
        r#"<a href="http://127.0.0.1:1/">Down</a>"#.to_string(),
    )
    .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(temp_dir.path());

    let report = run_crawl(&config, &target(&root, "Down"))
        .await
        .expect("Sweep failed");

    assert_eq!(report.broken_links.len(), 1);
    let record = &report.broken_links[0];
    assert_eq!(record.origin, root);
    assert_eq!(record.url, "http://127.0.0.1:1/");
    assert!(record.breakage.to_string().starts_with("error sending request"));
    assert!(!record.breakage.to_string().contains(':'));
}

#[tokio::test]
async fn test_targets_from_toml_config() {
    let docs = MockServer::start().await;
    let root = format!("{}/v1/index.html", docs.uri());

    mount_page(&docs, "/v1/index.html", r#"<a href="old.html">Old</a>"#.to_string()).await;

    Mock::given(method("GET"))
        .and(path("/v1/old.html"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&docs)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let toml = format!(
        r#"
[crawler]
concurrency = 2

[retry]
time-unit-ms = 1

[output]
directory = "{}"
file-prefix = "Dead Links"

[[target]]
root-url = "{}"
label = "Dev"
"#,
        temp_dir.path().display().to_string().replace('\\', "/"),
        root
    );
    let config = parse_config(&toml).expect("Failed to parse config");
    assert_eq!(config.targets.len(), 1);

    let report = run_crawl(&config, &config.targets[0])
        .await
        .expect("Sweep failed");
    assert_eq!(report.broken_links.len(), 1);

    let rows = read_report(&temp_dir.path().join("Dead Links Dev.csv"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "410");
}
