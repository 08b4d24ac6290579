//! Link prober tests through the public API

use crate::common::{mount_head_ok, mount_head_status};
use page_analyzer::analyzer::{build_http_client, LinkProber};
use page_analyzer::config::{BrowserConfig, ProbeConfig};
use page_analyzer::url::classify;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn prober(max_concurrent: u32) -> LinkProber {
    let client = build_http_client(&BrowserConfig::default()).unwrap();
    LinkProber::new(
        client,
        &ProbeConfig {
            max_concurrent,
            timeout_secs: 5,
        },
    )
}

#[tokio::test]
async fn test_twenty_links_one_not_found() {
    let server = MockServer::start().await;
    mount_head_status(&server, "/p13", 404).await;
    mount_head_ok(&server).await;

    let base = Url::parse(&server.uri()).unwrap();
    let hrefs: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();
    let links = classify(&hrefs, &base);
    assert_eq!(links.len(), 20);

    let broken = prober(10)
        .probe_all(
            &links,
            Instant::now() + Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].status_code(), Some(404));
    assert!(broken[0].url.ends_with("/p13"));
}

#[tokio::test]
async fn test_every_link_is_probed_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(12)
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    // Duplicates are probed once per occurrence
    let mut hrefs: Vec<String> = (0..10).map(|i| format!("/d{}", i)).collect();
    hrefs.push("/d0".to_string());
    hrefs.push("/d1".to_string());
    let links = classify(&hrefs, &base);

    let broken = prober(3)
        .probe_all(
            &links,
            Instant::now() + Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .await;

    assert!(broken.is_empty());
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let hrefs: Vec<String> = (0..8).map(|i| format!("/slow{}", i)).collect();
    let links = classify(&hrefs, &base);

    let start = std::time::Instant::now();
    let broken = prober(2)
        .probe_all(
            &links,
            Instant::now() + Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .await;
    let elapsed = start.elapsed();

    assert!(broken.is_empty());
    // Eight 250ms probes, two at a time: at least four waves
    assert!(elapsed >= Duration::from_millis(950), "too fast: {:?}", elapsed);
}
