//! Persistence seam for guest records.
//!
//! The registry only talks to a [`GuestStore`]; which backend sits behind it
//! is decided once at startup.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryGuestStore;
pub use postgres::PgGuestStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Guest, NewGuest};
use crate::ticket::TicketId;
use crate::utils::error::GuestError;

#[async_trait]
pub trait GuestStore: Send + Sync {
    /// Persists a new pending guest and returns it with its assigned id.
    async fn insert(&self, guest: NewGuest) -> Result<Guest, GuestError>;

    /// Every guest, most recently created first.
    async fn list_by_created_desc(&self) -> Result<Vec<Guest>, GuestError>;

    async fn get(&self, id: Uuid) -> Result<Option<Guest>, GuestError>;

    /// Scans the whole collection. Backends with an index should override.
    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Option<Guest>, GuestError> {
        let guests = self.list_by_created_desc().await?;
        Ok(guests.into_iter().find(|guest| &guest.ticket_id == ticket_id))
    }

    /// Flips a pending guest to checked in, stamping `at`.
    ///
    /// Returns `None` when no pending guest with `id` exists, including when
    /// another caller checked the guest in first.
    async fn mark_checked_in(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, GuestError>;
}
