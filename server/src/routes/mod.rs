use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{
    check_in_by_scan, check_in_guest, create_guest, decode_ticket, get_guest_by_ticket,
    guest_stats, health_check, list_guests,
};
use crate::registry::GuestRegistry;

pub fn create_routes(registry: Arc<GuestRegistry>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/guests", post(create_guest).get(list_guests))
        .route("/api/guests/stats", get(guest_stats))
        .route("/api/guests/by-ticket/:ticket_id", get(get_guest_by_ticket))
        .route("/api/guests/:guest_id/check-in", post(check_in_guest))
        .route("/api/check-in", post(check_in_by_scan))
        .route("/api/tickets/decode", post(decode_ticket))
        .with_state(registry)
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
}
