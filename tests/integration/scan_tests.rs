use std::time::{Duration, Instant};
use steam_buy_alert::{ShutdownSignal, WatchItem};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

#[tokio::test]
async fn test_alert_sent_once_for_unchanged_price() {
    let server = MockServer::start().await;
    mount_listing(&server, "Glove%20Case", ResponseTemplate::new(200).set_body_string(listing_page(5001))).await;
    mount_histogram(&server, 5001, "10550").await;
    Mock::given(method("POST"))
        .and(path(BOT_PATH))
        .and(body_string_contains("chat_id=42"))
        .and(body_string_contains("105.50"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let url = listing_url(&server, "Glove%20Case");
    let (mut scanner, health) = create_scanner(
        &server,
        vec![WatchItem::new(url.clone(), dollars("100.00"))],
        Duration::ZERO,
    );
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    let first = scanner.scan_once(&mut shutdown).await;
    let second = scanner.scan_once(&mut shutdown).await;

    assert_eq!(first.alerts_sent, 1);
    assert_eq!(second.alerts_sent, 0);
    assert_eq!(scanner.ledger().last_notified(&url), Some(dollars("105.50")));
    assert_eq!(health.error_count(), 0);
}

#[tokio::test]
async fn test_price_below_minimum_sends_nothing() {
    let server = MockServer::start().await;
    mount_listing(&server, "Spectrum%20Case", ResponseTemplate::new(200).set_body_string(listing_page(5002))).await;
    mount_histogram(&server, 5002, "9500").await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (mut scanner, _health) = create_scanner(
        &server,
        vec![WatchItem::new(listing_url(&server, "Spectrum%20Case"), dollars("100"))],
        Duration::ZERO,
    );
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    let report = scanner.scan_once(&mut shutdown).await;
    assert_eq!(report.quiet, 1);
    assert!(scanner.ledger().is_empty());
}

#[tokio::test]
async fn test_fallback_identifier_is_used() {
    let server = MockServer::start().await;
    let page = r#"<script>var g_rgAssets = {"item_nameid": "5003"};</script>"#;
    mount_listing(&server, "Fallback", ResponseTemplate::new(200).set_body_string(page)).await;
    mount_histogram(&server, 5003, "2000").await;
    Mock::given(method("POST"))
        .and(path(BOT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (mut scanner, _health) = create_scanner(
        &server,
        vec![WatchItem::new(listing_url(&server, "Fallback"), dollars("15"))],
        Duration::ZERO,
    );
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    assert_eq!(scanner.scan_once(&mut shutdown).await.alerts_sent, 1);
}

#[tokio::test]
async fn test_throttled_listing_pauses_and_skips_item() {
    let server = MockServer::start().await;
    mount_listing(&server, "Busy", ResponseTemplate::new(429)).await;
    mount_listing(&server, "Calm", ResponseTemplate::new(200).set_body_string(listing_page(5004))).await;
    mount_histogram(&server, 5004, "5000").await;
    Mock::given(method("POST"))
        .and(path(BOT_PATH))
        .and(body_string_contains("Calm"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let cooldown = Duration::from_millis(100);
    let busy = listing_url(&server, "Busy");
    let (mut scanner, health) = create_scanner(
        &server,
        vec![
            WatchItem::new(busy.clone(), dollars("10")),
            WatchItem::new(listing_url(&server, "Calm"), dollars("10")),
        ],
        cooldown,
    );
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    let started = Instant::now();
    let report = scanner.scan_once(&mut shutdown).await;

    assert!(started.elapsed() >= cooldown);
    assert_eq!(report.throttled, 1);
    assert_eq!(report.alerts_sent, 1);
    assert!(scanner.ledger().last_notified(&busy).is_none());
    assert_eq!(health.error_count(), 0);
}

#[tokio::test]
async fn test_throttled_histogram_pauses_and_skips_item() {
    let server = MockServer::start().await;
    mount_listing(&server, "Hot", ResponseTemplate::new(200).set_body_string(listing_page(5005))).await;
    Mock::given(method("GET"))
        .and(path("/market/itemordershistogram"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cooldown = Duration::from_millis(100);
    let (mut scanner, health) = create_scanner(
        &server,
        vec![WatchItem::new(listing_url(&server, "Hot"), dollars("1"))],
        cooldown,
    );
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    let started = Instant::now();
    let report = scanner.scan_once(&mut shutdown).await;

    assert!(started.elapsed() >= cooldown);
    assert_eq!(report.throttled, 1);
    assert!(scanner.ledger().is_empty());
    assert_eq!(health.error_count(), 0);
}

#[tokio::test]
async fn test_failures_increment_error_counter() {
    let server = MockServer::start().await;
    mount_listing(&server, "Gone", ResponseTemplate::new(404)).await;
    mount_listing(&server, "NoOrders", ResponseTemplate::new(200).set_body_string(listing_page(5006))).await;
    Mock::given(method("GET"))
        .and(path("/market/itemordershistogram"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":1,"highest_buy_order":null}"#))
        .mount(&server)
        .await;

    let (mut scanner, health) = create_scanner(
        &server,
        vec![
            WatchItem::new(listing_url(&server, "Gone"), dollars("1")),
            WatchItem::new(listing_url(&server, "NoOrders"), dollars("1")),
        ],
        Duration::ZERO,
    );
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    let report = scanner.scan_once(&mut shutdown).await;
    assert_eq!(report.unresolved, 1);
    assert_eq!(report.no_data, 1);
    assert_eq!(health.error_count(), 2);

    scanner.scan_once(&mut shutdown).await;
    assert_eq!(health.error_count(), 4);
}

#[tokio::test]
async fn test_rejected_notification_is_retried_next_pass() {
    let server = MockServer::start().await;
    mount_listing(&server, "Retry", ResponseTemplate::new(200).set_body_string(listing_page(5007))).await;
    mount_histogram(&server, 5007, "3000").await;
    Mock::given(method("POST"))
        .and(path(BOT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let (mut scanner, health) = create_scanner(
        &server,
        vec![WatchItem::new(listing_url(&server, "Retry"), dollars("20"))],
        Duration::ZERO,
    );
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    scanner.scan_once(&mut shutdown).await;
    scanner.scan_once(&mut shutdown).await;

    assert!(scanner.ledger().is_empty());
    assert_eq!(health.error_count(), 2);
}
