use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::ticket::TicketId;
use crate::utils::error::GuestError;

/// A guest record as the rest of the service sees it.
///
/// Only built through [`TryFrom<GuestRow>`] or by a store on insert, so
/// `checked_in_at.is_some() == checked_in` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: Uuid,
    pub name: String,
    pub ticket_id: TicketId,
    pub qr_data: String,
    pub qr_url: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to persist a new guest; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub name: String,
    pub ticket_id: TicketId,
    pub qr_data: String,
    pub qr_url: String,
    pub created_at: DateTime<Utc>,
}

impl NewGuest {
    pub fn into_guest(self, id: Uuid) -> Guest {
        Guest {
            id,
            name: self.name,
            ticket_id: self.ticket_id,
            qr_data: self.qr_data,
            qr_url: self.qr_url,
            checked_in: false,
            checked_in_at: None,
            created_at: self.created_at,
        }
    }
}

/// Raw `guests` row, before validation.
#[derive(Debug, Clone, FromRow)]
pub struct GuestRow {
    pub id: Uuid,
    pub name: String,
    pub ticket_id: String,
    pub qr_data: String,
    pub qr_url: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GuestRow> for Guest {
    type Error = GuestError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |reason: String| GuestError::CorruptRecord {
            id: id.to_string(),
            reason,
        };

        if row.name.trim().is_empty() {
            return Err(corrupt("empty name".to_string()));
        }

        let ticket_id: TicketId = row
            .ticket_id
            .parse()
            .map_err(|e: GuestError| corrupt(e.to_string()))?;

        match (row.checked_in, row.checked_in_at) {
            (true, None) => return Err(corrupt("checked in without a check-in time".to_string())),
            (false, Some(_)) => return Err(corrupt("check-in time on a pending guest".to_string())),
            _ => {}
        }

        Ok(Guest {
            id,
            name: row.name,
            ticket_id,
            qr_data: row.qr_data,
            qr_url: row.qr_url,
            checked_in: row.checked_in,
            checked_in_at: row.checked_in_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStats {
    pub total: usize,
    pub checked_in: usize,
    pub pending: usize,
}

impl GuestStats {
    pub fn tally<'a>(guests: impl IntoIterator<Item = &'a Guest>) -> Self {
        guests.into_iter().fold(Self::default(), |mut stats, guest| {
            stats.total += 1;
            if guest.checked_in {
                stats.checked_in += 1;
            } else {
                stats.pending += 1;
            }
            stats
        })
    }
}
