//! HTTP adapters over [`GuestRegistry`]. No business rules live here.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::registry::GuestRegistry;
use crate::ticket::TicketId;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub type AppState = Arc<GuestRegistry>;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CreateGuestRequest {
    pub name: String,
}

/// Raw text read off a scanned code.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub payload: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodedTicket {
    ticket_id: TicketId,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "guestlist-api",
    };

    success(payload, "Health check successful")
}

pub async fn create_guest(
    State(registry): State<AppState>,
    Json(request): Json<CreateGuestRequest>,
) -> Result<Response, AppError> {
    let guest = registry.create(&request.name).await?;
    let message = format!("Guest {} added", guest.name);
    Ok(created(guest, message))
}

pub async fn list_guests(State(registry): State<AppState>) -> Result<Response, AppError> {
    let guests = registry.list_all().await?;
    let message = format!("{} guest(s)", guests.len());
    Ok(success(guests, message))
}

pub async fn guest_stats(State(registry): State<AppState>) -> Result<Response, AppError> {
    let stats = registry.stats().await?;
    Ok(success(stats, "Guest counts"))
}

pub async fn get_guest_by_ticket(
    State(registry): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Response, AppError> {
    let ticket_id: TicketId = ticket_id
        .parse()
        .map_err(|_| AppError::NotFound(format!("no guest holds ticket {}", ticket_id)))?;
    let guest = registry.find_by_ticket(&ticket_id).await?;
    Ok(success(guest, "Guest found"))
}

pub async fn check_in_guest(
    State(registry): State<AppState>,
    Path(guest_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let outcome = registry.check_in(guest_id).await?;
    let message = outcome.message();
    Ok(success(outcome, message))
}

pub async fn check_in_by_scan(
    State(registry): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Response, AppError> {
    let outcome = registry.check_in_by_payload(&request.payload).await?;
    let message = outcome.message();
    Ok(success(outcome, message))
}

pub async fn decode_ticket(
    State(registry): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Response, AppError> {
    let ticket_id = registry.decode(&request.payload)?;
    Ok(success(DecodedTicket { ticket_id }, "Payload decoded"))
}
