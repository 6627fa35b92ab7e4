use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Workflow step recorded against a booking
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[sqlx(type_name = "booking_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingAction {
    Submitted,
    Approved,
    Rejected,
    Cancelled,
}

/// Audit trail entry for a booking
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct BookingActivityLog {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub action: BookingAction,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingActivityLog {
    pub async fn create<'e, E>(
        executor: E,
        booking_id: Uuid,
        action: BookingAction,
        note: Option<String>,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, BookingActivityLog>(
            r#"INSERT INTO booking_activity_logs (id, booking_id, action, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *"#,
        )
        .bind(id)
        .bind(booking_id)
        .bind(action)
        .bind(note)
        .fetch_one(executor)
        .await
    }

    /// Oldest first
    pub async fn find_by_booking_id(
        pool: &SqlitePool,
        booking_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BookingActivityLog>(
            r#"SELECT * FROM booking_activity_logs
            WHERE booking_id = $1
            ORDER BY created_at ASC, rowid ASC"#,
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await
    }
}
