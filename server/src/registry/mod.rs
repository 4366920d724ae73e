//! Guest registry: the only owner of guest persistence.
//!
//! Built once at startup from a [`GuestStore`], a [`TicketCodec`] and a
//! [`Clock`], then shared by reference with the HTTP layer.

pub mod check_in;

pub use check_in::{CheckInOutcome, CheckInState, Transition};

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Guest, GuestStats, NewGuest};
use crate::store::GuestStore;
use crate::ticket::{TicketCodec, TicketId};
use crate::utils::clock::Clock;
use crate::utils::error::GuestError;

pub struct GuestRegistry {
    store: Arc<dyn GuestStore>,
    codec: TicketCodec,
    clock: Arc<dyn Clock>,
}

impl GuestRegistry {
    pub fn new(store: Arc<dyn GuestStore>, codec: TicketCodec, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            codec,
            clock,
        }
    }

    /// Mints a ticket for `name` and stores the guest as pending.
    pub async fn create(&self, name: &str) -> Result<Guest, GuestError> {
        let name = name.trim();
        let created_at = self.clock.now();
        let minted = self.codec.mint(name, created_at)?;
        let qr_url = self.codec.qr_url(&minted.qr_data);

        let guest = self
            .store
            .insert(NewGuest {
                name: name.to_string(),
                ticket_id: minted.ticket_id,
                qr_data: minted.qr_data,
                qr_url,
                created_at,
            })
            .await?;

        info!(guest_id = %guest.id, ticket_id = %guest.ticket_id, "Guest added");
        Ok(guest)
    }

    /// Every guest, newest first.
    pub async fn list_all(&self) -> Result<Vec<Guest>, GuestError> {
        self.store.list_by_created_desc().await
    }

    pub async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Guest, GuestError> {
        self.store
            .find_by_ticket(ticket_id)
            .await?
            .ok_or_else(|| GuestError::NotFound(format!("no guest holds ticket {}", ticket_id)))
    }

    pub async fn check_in(&self, guest_id: Uuid) -> Result<CheckInOutcome, GuestError> {
        let guest = self.get(guest_id).await?;

        match check_in::transition(CheckInState::of(&guest), self.clock.now()) {
            Transition::AlreadyDone { at } => {
                debug!(guest_id = %guest_id, checked_in_at = %at, "Guest already checked in");
                Ok(CheckInOutcome::AlreadyCheckedIn(guest))
            }
            Transition::Apply { at } => match self.store.mark_checked_in(guest_id, at).await? {
                Some(updated) => {
                    info!(guest_id = %guest_id, ticket_id = %updated.ticket_id, "Guest checked in");
                    Ok(CheckInOutcome::CheckedIn(updated))
                }
                None => {
                    // Another check-in landed between our read and the conditional update
                    warn!(guest_id = %guest_id, "Concurrent check-in won the race");
                    let current = self.get(guest_id).await?;
                    Ok(CheckInOutcome::AlreadyCheckedIn(current))
                }
            },
        }
    }

    /// Extracts the ticket id from a scanned payload.
    pub fn decode(&self, payload: &str) -> Result<TicketId, GuestError> {
        self.codec.decode(payload)
    }

    /// Full entrance flow: decode the scan, look the ticket up, check in.
    pub async fn check_in_by_payload(&self, payload: &str) -> Result<CheckInOutcome, GuestError> {
        let ticket_id = self.decode(payload)?;
        let guest = self.find_by_ticket(&ticket_id).await?;
        self.check_in(guest.id).await
    }

    pub async fn stats(&self) -> Result<GuestStats, GuestError> {
        let guests = self.list_all().await?;
        Ok(GuestStats::tally(&guests))
    }

    async fn get(&self, guest_id: Uuid) -> Result<Guest, GuestError> {
        self.store
            .get(guest_id)
            .await?
            .ok_or_else(|| GuestError::NotFound(format!("no guest with id {}", guest_id)))
    }
}
