//! Drives the HTTP surface end to end over the in-memory store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use guestlist_server::routes::create_routes;
use guestlist_server::utils::clock::ManualClock;
use guestlist_server::{GuestRegistry, InMemoryGuestStore, TicketCodec};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

fn create_test_app(start_millis: i64) -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_millis(start_millis));
    let registry = GuestRegistry::new(
        Arc::new(InMemoryGuestStore::new()),
        TicketCodec::new("https://render.test/qr"),
        clock.clone(),
    );
    (create_routes(Arc::new(registry)), clock)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn add_guest(app: &Router, name: &str) -> Value {
    let (status, body) = send(app, "POST", "/api/guests", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app(1_000);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_create_guest() {
    let (app, _) = create_test_app(1_700_000_000_000);

    let guest = add_guest(&app, "Ada Lovelace").await;
    assert_eq!(guest["name"], "Ada Lovelace");
    assert_eq!(guest["ticketId"], "TG-1700000000000");
    assert_eq!(guest["qrData"], "TG_WEDDING:TG-1700000000000:Ada Lovelace");
    assert_eq!(
        guest["qrUrl"],
        "https://render.test/qr?size=400x400&data=TG_WEDDING%3ATG-1700000000000%3AAda%20Lovelace"
    );
    assert_eq!(guest["checkedIn"], false);
    assert!(guest["checkedInAt"].is_null());
}

#[tokio::test]
async fn test_create_guest_blank_name() {
    let (app, _) = create_test_app(1_000);

    let (status, body) = send(&app, "POST", "/api/guests", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_newest_first_and_stats() {
    let (app, clock) = create_test_app(1_000);
    let a = add_guest(&app, "A").await;
    clock.set_millis(2_000);
    let b = add_guest(&app, "B").await;

    let (status, body) = send(&app, "GET", "/api/guests", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|guest| guest["id"].clone())
        .collect();
    assert_eq!(ids, vec![b["id"].clone(), a["id"].clone()]);

    let uri = format!("/api/guests/{}/check-in", a["id"].as_str().unwrap());
    send(&app, "POST", &uri, None).await;

    let (_, body) = send(&app, "GET", "/api/guests/stats", None).await;
    assert_eq!(body["data"], json!({ "total": 2, "checkedIn": 1, "pending": 1 }));
}

#[tokio::test]
async fn test_lookup_by_ticket() {
    let (app, _) = create_test_app(1_000);
    let guest = add_guest(&app, "Grace").await;

    let uri = format!("/api/guests/by-ticket/{}", guest["ticketId"].as_str().unwrap());
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], guest["id"]);

    let (status, body) = send(&app, "GET", "/api/guests/by-ticket/TG-5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_check_in_twice_by_id() {
    let (app, clock) = create_test_app(1_000);
    let guest = add_guest(&app, "Ada").await;
    let uri = format!("/api/guests/{}/check-in", guest["id"].as_str().unwrap());

    clock.set_millis(5_000);
    let (status, first) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["status"], "checked_in");
    assert_eq!(first["data"]["guest"]["checkedIn"], true);
    assert!(first["data"]["guest"]["checkedInAt"].is_string());

    clock.set_millis(9_000);
    let (status, second) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["status"], "already_checked_in");
    assert_eq!(second["message"], "Ada has already checked in");
    assert_eq!(
        second["data"]["guest"]["checkedInAt"],
        first["data"]["guest"]["checkedInAt"]
    );
}

#[tokio::test]
async fn test_check_in_unknown_guest() {
    let (app, _) = create_test_app(1_000);
    let uri = "/api/guests/00000000-0000-0000-0000-000000000000/check-in";

    let (status, body) = send(&app, "POST", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_check_in_by_scanned_payload() {
    let (app, _) = create_test_app(1_000);
    let guest = add_guest(&app, "Dr. Who: The Doctor").await;

    let scan = json!({ "payload": guest["qrData"] });
    let (status, body) = send(&app, "POST", "/api/check-in", Some(scan.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "checked_in");
    assert_eq!(body["data"]["guest"]["id"], guest["id"]);

    let (_, body) = send(&app, "POST", "/api/check-in", Some(scan)).await;
    assert_eq!(body["data"]["status"], "already_checked_in");
}

#[tokio::test]
async fn test_scan_rejects_foreign_payload() {
    let (app, _) = create_test_app(1_000);

    let (status, body) = send(
        &app,
        "POST",
        "/api/check-in",
        Some(json!({ "payload": "FOO:123:Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MALFORMED_PAYLOAD");

    let (status, _) = send(
        &app,
        "POST",
        "/api/check-in",
        Some(json!({ "payload": "TG_WEDDING:TG-123:Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_decode_ticket() {
    let (app, _) = create_test_app(1_000);

    let (status, body) = send(
        &app,
        "POST",
        "/api/tickets/decode",
        Some(json!({ "payload": "TG_WEDDING:TG-42:Ada: Countess" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ticketId"], "TG-42");
}
