//! Full scans over real HTTP against a local mock server.

mod helpers;

use httptest::{matchers::*, responders::*, Expectation, Server};
use redirect_check::run_scan;
use tempfile::TempDir;

use helpers::{report_path, test_config, write_domains};

/// `127.0.0.1:<port>` and `localhost:<port>` name the same server but are
/// different hosts, which is enough to produce a notable redirect.
fn localhost_url(server: &Server, path: &str) -> String {
    let addr = server.addr();
    format!("http://localhost:{}{}", addr.port(), path)
}

/// Binds IPv4 loopback so `localhost` reaches the server where it resolves
/// only to `127.0.0.1`.
fn ipv4_server() -> Server {
    httptest::ServerBuilder::new()
        .bind_addr(([127, 0, 0, 1], 0).into())
        .run()
        .unwrap()
}

#[tokio::test]
async fn test_run_scan_reports_location_redirect() {
    let server = ipv4_server();
    let target = localhost_url(&server, "/home");
    server.expect(
        Expectation::matching(request::method_path("GET", "/old"))
            .respond_with(status_code(301).insert_header("Location", target.as_str())),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/home")).respond_with(
            status_code(200)
                .insert_header("Content-Type", "text/plain")
                .body("ok"),
        ),
    );

    let start = server.url("/old").to_string();
    let input = write_domains(&[start.as_str()]);
    let dir = TempDir::new().unwrap();
    let output = report_path(&dir);

    let report = run_scan(test_config(input.path(), &output)).await.unwrap();

    assert_eq!(report.notable, 1);
    assert_eq!(report.probe_failures, 0);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        format!("localhost redirects\n{}\n", start)
    );
}

#[tokio::test]
async fn test_run_scan_reports_meta_refresh_redirect() {
    let server = ipv4_server();
    let target = localhost_url(&server, "/new");
    let page = format!(
        r#"<html><head><meta http-equiv="refresh" content="0; url={}"></head></html>"#,
        target
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/")).respond_with(
            status_code(200)
                .insert_header("Content-Type", "text/html")
                .body(page),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/new")).respond_with(
            status_code(200)
                .insert_header("Content-Type", "text/html")
                .body("<html></html>"),
        ),
    );

    let start = server.url("/").to_string();
    let input = write_domains(&[start.as_str()]);
    let dir = TempDir::new().unwrap();
    let output = report_path(&dir);

    let mut config = test_config(input.path(), &output);
    config.settle_seconds = 1;
    let report = run_scan(config).await.unwrap();

    assert_eq!(report.notable, 1);
    assert!(std::fs::read_to_string(&output)
        .unwrap()
        .starts_with("localhost redirects\n"));
}

#[tokio::test]
async fn test_run_scan_same_host_redirect_is_not_reported() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/a"))
            .respond_with(status_code(302).insert_header("Location", "/b")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/b")).respond_with(status_code(200)),
    );

    let start = server.url("/a").to_string();
    let input = write_domains(&[start.as_str()]);
    let dir = TempDir::new().unwrap();
    let output = report_path(&dir);

    let report = run_scan(test_config(input.path(), &output)).await.unwrap();

    assert_eq!(report.redirected, 1);
    assert_eq!(report.notable, 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}
