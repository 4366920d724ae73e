use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::GuestStore;
use crate::models::{Guest, GuestRow, NewGuest};
use crate::ticket::TicketId;
use crate::utils::error::GuestError;

const GUEST_COLUMNS: &str =
    "id, name, ticket_id, qr_data, qr_url, checked_in, checked_in_at, created_at";

#[derive(Debug, Clone)]
pub struct PgGuestStore {
    pool: PgPool,
}

impl PgGuestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

#[async_trait]
impl GuestStore for PgGuestStore {
    async fn insert(&self, guest: NewGuest) -> Result<Guest, GuestError> {
        let sql = format!(
            "INSERT INTO guests (id, name, ticket_id, qr_data, qr_url, checked_in, checked_in_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, FALSE, NULL, $6) \
             RETURNING {}",
            GUEST_COLUMNS
        );

        let row: GuestRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&guest.name)
            .bind(guest.ticket_id.as_str())
            .bind(&guest.qr_data)
            .bind(&guest.qr_url)
            .bind(guest.created_at)
            .fetch_one(&self.pool)
            .await?;

        debug!(guest_id = %row.id, "Inserted guest row");
        row.try_into()
    }

    async fn list_by_created_desc(&self) -> Result<Vec<Guest>, GuestError> {
        let sql = format!(
            "SELECT {} FROM guests \
             ORDER BY created_at DESC, length(ticket_id) DESC, ticket_id DESC",
            GUEST_COLUMNS
        );

        let rows: Vec<GuestRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Guest::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Guest>, GuestError> {
        let sql = format!("SELECT {} FROM guests WHERE id = $1", GUEST_COLUMNS);

        let row: Option<GuestRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Guest::try_from).transpose()
    }

    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Option<Guest>, GuestError> {
        let sql = format!("SELECT {} FROM guests WHERE ticket_id = $1", GUEST_COLUMNS);

        let row: Option<GuestRow> = sqlx::query_as(&sql)
            .bind(ticket_id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Guest::try_from).transpose()
    }

    async fn mark_checked_in(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, GuestError> {
        // Conditional on the pending state, so racing check-ins cannot both win
        let sql = format!(
            "UPDATE guests SET checked_in = TRUE, checked_in_at = $2 \
             WHERE id = $1 AND checked_in = FALSE \
             RETURNING {}",
            GUEST_COLUMNS
        );

        let row: Option<GuestRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Guest::try_from).transpose()
    }
}
