//! End-to-end analysis tests

use crate::common::{
    html, mount_head_ok, mount_head_status, mount_page, refused_url, test_config, TEST_USER_AGENT,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use page_analyzer::{Analyzer, AnalyzerError, ErrorKind, HtmlVersion, LinkScope, TransportFailure};
use std::io::Write;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STRUCTURED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>  Account Portal </title></head>
<body>
  <h1>Welcome</h1>
  <h2>Sign in</h2>
  <h2>Help</h2>
  <h3>FAQ</h3>
  <form action="/login" method="post">
    <input type="text" name="user">
    <input type="password" name="pass">
  </form>
  <a href="/about">About</a>
  <a href="mailto:help@example.com">Mail us</a>
  <a href="tel:+15550100">Call</a>
  <a href="javascript:void(0)">Nothing</a>
</body>
</html>"#;

#[tokio::test]
async fn test_page_structure_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, "/", STRUCTURED_PAGE).await;
    mount_head_ok(&server).await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.structure.title, "Account Portal");
    assert_eq!(result.structure.h1_count, 1);
    assert_eq!(result.structure.h2_count, 2);
    assert_eq!(result.structure.h3_count, 1);
    assert_eq!(result.structure.html_version, HtmlVersion::Html5);
    assert!(result.structure.has_login_form);

    // Non-HTTP schemes are dropped
    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 0);
    assert!(result.broken_links.is_empty());
}

#[tokio::test]
async fn test_login_form_detected() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/login",
        r#"<html><body><form><input type="password" name="pw"></form></body></html>"#,
    )
    .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer
        .analyze(&format!("{}/login", server.uri()))
        .await
        .unwrap();

    assert!(result.structure.has_login_form);
}

#[tokio::test]
async fn test_legacy_doctype_is_reported() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">
<html><head><title>Old</title></head><body></body></html>"#,
    )
    .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.structure.html_version.as_str(), "HTML 4.01 Strict");
    assert_ne!(result.structure.html_version, HtmlVersion::Html5);
}

#[tokio::test]
async fn test_missing_doctype_is_unknown() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<html><body><p>No doctype</p></body></html>").await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.structure.html_version, HtmlVersion::Unknown);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let target = refused_url();
    let analyzer = Analyzer::new(test_config()).unwrap();

    let err = analyzer.analyze(&target).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    match &err {
        AnalyzerError::Transport(TransportFailure::ConnectionRefused { url }) => {
            assert_eq!(url, &target);
        }
        other => panic!("expected connection refused, got {:?}", other),
    }
    assert!(err.to_string().starts_with("connection refused:"));
}

#[tokio::test]
async fn test_http_error_status_fails_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let err = analyzer.analyze(&server.uri()).await.unwrap_err();

    match err {
        AnalyzerError::Transport(TransportFailure::HttpStatus { status, ref reason, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(reason, "Internal Server Error");
        }
        other => panic!("expected HTTP status failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_target_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let err = analyzer.analyze("invalid-url").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_binary_body_is_parse_error() {
    let server = MockServer::start().await;
    let mut body = b"\x89PNG\r\n\x1a\n".to_vec();
    body.extend_from_slice(&[0, 0, 0, 13]);
    body.extend_from_slice(b"IHDR");
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "image/png"))
        .mount(&server)
        .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let err = analyzer
        .analyze(&format!("{}/image", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn test_zero_anchors_issue_no_probes() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><head><title>Empty</title></head><body><p>Nothing to see</p></body></html>",
    )
    .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.internal_links, 0);
    assert_eq!(result.external_links, 0);
    assert!(result.broken_links.is_empty());
}

#[tokio::test]
async fn test_all_links_healthy() {
    let server = MockServer::start().await;
    let anchors: String = (0..30)
        .map(|i| format!(r#"<a href="/page{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &format!("<html><body>{}</body></html>", anchors)).await;
    mount_head_ok(&server).await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.internal_links, 30);
    assert!(result.broken_links.is_empty());
}

#[tokio::test]
async fn test_one_broken_link_among_twenty() {
    let server = MockServer::start().await;
    let anchors: String = (0..20)
        .map(|i| format!(r#"<a href="/link{}">Link {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &format!("<html><body>{}</body></html>", anchors)).await;
    mount_head_status(&server, "/link7", 404).await;
    mount_head_ok(&server).await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.internal_links, 20);
    assert_eq!(result.broken_links.len(), 1);

    let broken = &result.broken_links[0];
    assert_eq!(broken.url, format!("{}/link7", server.uri()));
    assert_eq!(broken.status_code(), Some(404));
    assert_eq!(broken.error(), Some("404 Not Found"));
    assert_eq!(broken.scope, LinkScope::Internal);
}

#[tokio::test]
async fn test_internal_and_external_links() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    let body = format!(
        r##"<html><body>
            <a href="/a">A</a>
            <a href="b">B</a>
            <a href="#section">Section</a>
            <a href="{other}/x">X</a>
            <a href="{other}/gone">Gone</a>
            <a href="/a">A again</a>
        </body></html>"##,
        other = other.uri()
    );
    mount_page(&site, "/", &body).await;
    mount_head_ok(&site).await;
    mount_head_status(&other, "/gone", 410).await;
    mount_head_ok(&other).await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&site.uri()).await.unwrap();

    // Duplicates count once per occurrence; the fragment link is internal
    assert_eq!(result.internal_links, 4);
    assert_eq!(result.external_links, 2);
    assert_eq!(result.total_links(), 6);

    assert_eq!(result.broken_links.len(), 1);
    assert_eq!(result.broken_links[0].scope, LinkScope::External);
    assert_eq!(result.broken_links[0].status_code(), Some(410));
}

#[tokio::test]
async fn test_relative_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/docs/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/docs/new",
        r#"<html><body><a href="child">Child</a></body></html>"#,
    )
    .await;
    mount_head_status(&server, "/docs/child", 404).await;
    mount_head_ok(&server).await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer
        .analyze(&format!("{}/docs/old", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.url, format!("{}/docs/new", server.uri()));
    assert_eq!(result.broken_links.len(), 1);
    assert_eq!(
        result.broken_links[0].url,
        format!("{}/docs/child", server.uri())
    );
}

#[tokio::test]
async fn test_gzip_body_is_decoded() {
    let server = MockServer::start().await;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(b"<html><head><title>Compressed</title></head><body><h1>Zip</h1></body></html>")
        .unwrap();
    let compressed = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_raw(compressed, "text/html"),
        )
        .mount(&server)
        .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.structure.title, "Compressed");
    assert_eq!(result.structure.h1_count, 1);
}

#[tokio::test]
async fn test_browser_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", TEST_USER_AGENT))
        .and(header("accept-encoding", "gzip"))
        .and(header("upgrade-insecure-requests", "1"))
        .and(header_exists("accept"))
        .and(header_exists("accept-language"))
        .respond_with(html("<html><head><title>Headers</title></head></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(result.structure.title, "Headers");
}

#[tokio::test]
async fn test_deadline_returns_partial_result() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/dead">Dead</a><a href="/slow">Slow</a></body></html>"#,
    )
    .await;
    mount_head_status(&server, "/dead", 404).await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.analysis.deadline_secs = 2;
    config.fetch.timeout_secs = 1;
    config.probe.timeout_secs = 30;

    let analyzer = Analyzer::new(config).unwrap();
    let start = Instant::now();
    let result = analyzer.analyze(&server.uri()).await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(result.internal_links, 2);
    assert_eq!(result.broken_links.len(), 1);
    assert_eq!(result.broken_links[0].url, format!("{}/dead", server.uri()));
}

#[tokio::test]
async fn test_cancellation_during_probing_returns_partial_result() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/dead">Dead</a><a href="/slow">Slow</a></body></html>"#,
    )
    .await;
    mount_head_status(&server, "/dead", 404).await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.probe.timeout_secs = 30;
    config.analysis.deadline_secs = 60;

    let analyzer = Analyzer::new(config).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(700)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let result = analyzer
        .analyze_with_cancellation(&server.uri(), &cancel)
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(result.broken_links.len(), 1);
    assert_eq!(result.broken_links[0].url, format!("{}/dead", server.uri()));
}

#[tokio::test]
async fn test_slow_fetch_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<html></html>").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.fetch.timeout_secs = 1;

    let analyzer = Analyzer::new(config).unwrap();
    let err = analyzer.analyze(&server.uri()).await.unwrap_err();

    match err {
        AnalyzerError::Transport(TransportFailure::Timeout { limit, .. }) => {
            assert_eq!(limit, Duration::from_secs(1));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_repeated_analysis_is_stable() {
    let server = MockServer::start().await;
    mount_page(&server, "/", STRUCTURED_PAGE).await;
    mount_head_ok(&server).await;

    let analyzer = Analyzer::new(test_config()).unwrap();
    let first = analyzer.analyze(&server.uri()).await.unwrap();
    let second = analyzer.analyze(&server.uri()).await.unwrap();

    assert_eq!(first.structure, second.structure);
    assert_eq!(first.internal_links, second.internal_links);
    assert_eq!(first.external_links, second.external_links);

    // Both runs hit the server; nothing is memoized
    let gets = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.to_string() == "GET")
        .count();
    assert_eq!(gets, 2);
}
