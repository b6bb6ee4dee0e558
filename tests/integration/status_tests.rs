use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use std::sync::Arc;
use std::time::Duration;
use steam_buy_alert::{
    web::{create_router, AppState, StatusResponse},
    ShutdownSignal, WatchItem,
};
use tower::ServiceExt;
use wiremock::{MockServer, ResponseTemplate};

use super::*;

async fn fetch_status(state: AppState) -> StatusResponse {
    let response = create_router(state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_status_tracks_scans_and_errors() {
    let server = MockServer::start().await;
    mount_listing(&server, "Broken", ResponseTemplate::new(503)).await;

    let (mut scanner, health) = create_scanner(
        &server,
        vec![WatchItem::new(listing_url(&server, "Broken"), dollars("1"))],
        Duration::ZERO,
    );
    let state = AppState { health: Arc::clone(&health) };
    let (_trigger, mut shutdown) = ShutdownSignal::new();

    let before = fetch_status(state.clone()).await;
    assert_eq!(before.status, "ok");
    assert!(before.ultimo_escaneo.is_none());
    assert_eq!(before.errores, 0);

    scanner.scan_once(&mut shutdown).await;
    let after_first = fetch_status(state.clone()).await;
    assert!(after_first.ultimo_escaneo.is_some());
    assert_eq!(after_first.errores, 1);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    scanner.scan_once(&mut shutdown).await;
    let after_second = fetch_status(state).await;
    assert!(after_second.errores > after_first.errores);
    assert!(after_second.ultimo_escaneo > after_first.ultimo_escaneo);
}
