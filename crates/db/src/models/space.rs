use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A physical function space (hall, dining room, chapel...)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct SpaceReservation {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub space_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSpaceReservation {
    pub space_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Space {
    pub async fn create(pool: &SqlitePool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Space>("INSERT INTO spaces (id, name) VALUES ($1, $2) RETURNING *")
            .bind(Uuid::new_v4())
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }
}

impl SpaceReservation {
    pub async fn create(
        pool: &SqlitePool,
        booking_id: Uuid,
        data: &CreateSpaceReservation,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SpaceReservation>(
            r#"INSERT INTO space_reservations (id, booking_id, space_id, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(data.space_id)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_booking_id(
        pool: &SqlitePool,
        booking_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SpaceReservation>(
            r#"SELECT * FROM space_reservations
            WHERE booking_id = $1
            ORDER BY starts_at ASC"#,
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await
    }

    /// Count pairs of (this booking's reservation, another live booking's
    /// reservation) that hold the same space over an overlapping interval.
    /// Rejected and cancelled bookings no longer hold their spaces.
    pub async fn count_conflicts_for_booking(
        pool: &SqlitePool,
        booking_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
            FROM space_reservations own
            JOIN space_reservations other
              ON other.space_id = own.space_id
             AND other.booking_id != own.booking_id
             AND own.starts_at < other.ends_at
             AND other.starts_at < own.ends_at
            JOIN bookings b ON b.id = other.booking_id
            WHERE own.booking_id = $1
              AND b.status NOT IN ('rejected', 'cancelled')"#,
        )
        .bind(booking_id)
        .fetch_one(pool)
        .await
    }
}
