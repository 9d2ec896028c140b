//! Reservation repository

use chrono::NaiveDate;
use lb_core::Id;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::repository::{RepositoryError, RepositoryResult};
use crate::store::{PgStore, StoreClient};

/// Number of reservations returned when the caller does not pick a limit
pub const DEFAULT_RESERVATION_LIMIT: i64 = 10;

/// A guest's reservation joined with the reserved property
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ReservationRow {
    pub id: Id,
    pub title: String,
    /// Cost per night in cents
    pub cost_per_night: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` when the property has no reviews
    pub average_rating: Option<f64>,
}

/// Reservation repository implementation
pub struct ReservationRepository<S = PgStore> {
    store: S,
}

impl ReservationRepository<PgStore> {
    /// Repository backed by the PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(PgStore::new(pool))
    }
}

impl<S: StoreClient> ReservationRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reservations made by `guest_id`, most recent start date first
    pub async fn list_for_guest(
        &self,
        guest_id: Id,
        limit: i64,
    ) -> RepositoryResult<Vec<ReservationRow>> {
        if limit < 1 {
            return Err(RepositoryError::Validation(format!(
                "limit must be at least 1, got {}",
                limit
            )));
        }

        let rows = self
            .store
            .fetch_reservations(guest_id, limit)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, guest_id, "Reservation listing failed");
                e
            })?;

        tracing::debug!(guest_id, rows = rows.len(), "Listed reservations");
        Ok(rows)
    }
}
