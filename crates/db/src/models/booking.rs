use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type, types::Json};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Accommodation category a customer can request and a room can be counted towards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display)]
pub enum RoomCategory {
    #[serde(rename = "doubleBB")]
    #[strum(serialize = "doubleBB")]
    DoubleBb,
    #[serde(rename = "singleBB")]
    #[strum(serialize = "singleBB")]
    SingleBb,
    #[serde(rename = "studySuite")]
    #[strum(serialize = "studySuite")]
    StudySuite,
    #[serde(rename = "doubleEnsuite")]
    #[strum(serialize = "doubleEnsuite")]
    DoubleEnsuite,
}

impl RoomCategory {
    pub const ALL: [RoomCategory; 4] = [
        RoomCategory::DoubleBb,
        RoomCategory::SingleBb,
        RoomCategory::StudySuite,
        RoomCategory::DoubleEnsuite,
    ];
}

/// Rooms requested per category. Missing keys deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct AccommodationRequests {
    #[serde(rename = "doubleBB")]
    pub double_bb: u32,
    #[serde(rename = "singleBB")]
    pub single_bb: u32,
    #[serde(rename = "studySuite")]
    pub study_suite: u32,
    #[serde(rename = "doubleEnsuite")]
    pub double_ensuite: u32,
}

impl AccommodationRequests {
    pub fn get(&self, category: RoomCategory) -> u32 {
        match category {
            RoomCategory::DoubleBb => self.double_bb,
            RoomCategory::SingleBb => self.single_bb,
            RoomCategory::StudySuite => self.study_suite,
            RoomCategory::DoubleEnsuite => self.double_ensuite,
        }
    }

    pub fn total(&self) -> u32 {
        RoomCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Booking {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub event_name: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub headcount: i32,
    pub is_overnight: bool,
    pub catering_required: bool,
    #[sqlx(json)]
    pub accommodation_requests: AccommodationRequests,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub approved_at: Option<DateTime<Utc>>, // Set once, when the booking is approved
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateBooking {
    pub customer_name: String,
    pub customer_email: String,
    pub event_name: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub headcount: i32,
    pub is_overnight: bool,
    pub catering_required: bool,
    #[serde(default)]
    pub accommodation_requests: AccommodationRequests,
    pub notes: Option<String>,
}

impl Booking {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateBooking,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (
                id, customer_name, customer_email, event_name, arrival_date, departure_date,
                headcount, is_overnight, catering_required, accommodation_requests, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *"#,
        )
        .bind(id)
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(&data.event_name)
        .bind(data.arrival_date)
        .bind(data.departure_date)
        .bind(data.headcount)
        .bind(data.is_overnight)
        .bind(data.catering_required)
        .bind(Json(data.accommodation_requests))
        .bind(&data.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings ORDER BY arrival_date ASC, created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_status(
        pool: &SqlitePool,
        status: BookingStatus,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"SELECT * FROM bookings
            WHERE status = $1
            ORDER BY arrival_date ASC, created_at DESC"#,
        )
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Move the booking to `to` if its current status is one of `from`.
    /// Approving stamps `approved_at`.
    ///
    /// The status check and the write are one statement, so of two racing
    /// transitions out of the same status only one succeeds. `None` means the
    /// booking is missing or no longer in a `from` status.
    pub async fn transition_status<'e, E>(
        executor: E,
        id: Uuid,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Booking>(
            r#"UPDATE bookings
            SET status = $2,
                approved_at = CASE WHEN $2 = 'approved' THEN datetime('now', 'subsec') ELSE approved_at END,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
              AND status IN (SELECT value FROM json_each($3))
            RETURNING *"#,
        )
        .bind(id)
        .bind(to)
        .bind(Json(from.to_vec()))
        .fetch_optional(executor)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
