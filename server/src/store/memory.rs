use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::GuestStore;
use crate::models::{Guest, NewGuest};
use crate::utils::error::GuestError;

/// Process-local store for development and tests. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryGuestStore {
    guests: RwLock<Vec<Guest>>,
}

impl InMemoryGuestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GuestStore for InMemoryGuestStore {
    async fn insert(&self, guest: NewGuest) -> Result<Guest, GuestError> {
        let guest = guest.into_guest(Uuid::new_v4());
        self.guests.write().await.push(guest.clone());
        Ok(guest)
    }

    async fn list_by_created_desc(&self) -> Result<Vec<Guest>, GuestError> {
        let mut guests = self.guests.read().await.clone();
        guests.sort_by_key(|guest| Reverse((guest.created_at, guest.ticket_id.millis())));
        Ok(guests)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Guest>, GuestError> {
        let guests = self.guests.read().await;
        Ok(guests.iter().find(|guest| guest.id == id).cloned())
    }

    async fn mark_checked_in(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, GuestError> {
        let mut guests = self.guests.write().await;
        let updated = guests
            .iter_mut()
            .find(|guest| guest.id == id && !guest.checked_in)
            .map(|guest| {
                guest.checked_in = true;
                guest.checked_in_at = Some(at);
                guest.clone()
            });
        Ok(updated)
    }
}
