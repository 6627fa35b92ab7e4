use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RoomType {
    pub id: Uuid,
    pub name: String, // Free text, e.g. "Queen" or "Twin Single"
    pub created_at: DateTime<Utc>,
}

/// A bookable room and the options it physically supports
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Room {
    pub id: Uuid,
    pub room_number: String,
    pub room_type_id: Uuid,
    pub room_type_name: String,
    pub extra_bed_allowed: bool,
    pub ensuite_available: bool,
    pub private_study_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateRoom {
    pub room_number: String,
    pub room_type_id: Uuid,
    pub extra_bed_allowed: bool,
    pub ensuite_available: bool,
    pub private_study_available: bool,
}

/// Options chosen for a room when it is allocated to a booking. Unset means not selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize, TS)]
pub struct AssignmentSelection {
    pub extra_bed_selected: Option<bool>,
    pub ensuite_selected: Option<bool>,
    pub private_study_selected: Option<bool>,
}

/// Allocation of one room to one booking
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RoomAssignment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub room_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub selection: AssignmentSelection,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Room joined with its type name and the booking's selection for it
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct RoomWithAssignment {
    pub room_id: Uuid,
    pub room_number: String,
    pub room_type_name: String,
    pub extra_bed_allowed: bool,
    pub ensuite_available: bool,
    pub private_study_available: bool,
    pub selection: Option<AssignmentSelection>,
}

#[derive(FromRow)]
struct RoomWithAssignmentRow {
    room_id: Uuid,
    room_number: String,
    room_type_name: String,
    extra_bed_allowed: bool,
    ensuite_available: bool,
    private_study_available: bool,
    #[sqlx(flatten)]
    selection: AssignmentSelection,
}

impl From<RoomWithAssignmentRow> for RoomWithAssignment {
    fn from(row: RoomWithAssignmentRow) -> Self {
        Self {
            room_id: row.room_id,
            room_number: row.room_number,
            room_type_name: row.room_type_name,
            extra_bed_allowed: row.extra_bed_allowed,
            ensuite_available: row.ensuite_available,
            private_study_available: row.private_study_available,
            selection: Some(row.selection),
        }
    }
}

impl RoomType {
    pub async fn create(pool: &SqlitePool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RoomType>(
            "INSERT INTO room_types (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, RoomType>("SELECT * FROM room_types ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }
}

impl Room {
    pub async fn create(pool: &SqlitePool, data: &CreateRoom) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO rooms (
                id, room_number, room_type_id, extra_bed_allowed, ensuite_available, private_study_available
            )
            VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(id)
        .bind(&data.room_number)
        .bind(data.room_type_id)
        .bind(data.extra_bed_allowed)
        .bind(data.ensuite_available)
        .bind(data.private_study_available)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Room>(
            r#"SELECT r.id, r.room_number, r.room_type_id, rt.name AS room_type_name,
                r.extra_bed_allowed, r.ensuite_available, r.private_study_available, r.created_at
            FROM rooms r
            JOIN room_types rt ON rt.id = r.room_type_id
            WHERE r.id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Room>(
            r#"SELECT r.id, r.room_number, r.room_type_id, rt.name AS room_type_name,
                r.extra_bed_allowed, r.ensuite_available, r.private_study_available, r.created_at
            FROM rooms r
            JOIN room_types rt ON rt.id = r.room_type_id
            ORDER BY r.room_number ASC"#,
        )
        .fetch_all(pool)
        .await
    }
}

impl RoomAssignment {
    /// Allocate `room_id` to the booking, replacing any earlier selection for the same pair
    pub async fn upsert(
        pool: &SqlitePool,
        booking_id: Uuid,
        room_id: Uuid,
        selection: &AssignmentSelection,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RoomAssignment>(
            r#"INSERT INTO room_assignments (
                id, booking_id, room_id, extra_bed_selected, ensuite_selected, private_study_selected
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(booking_id, room_id) DO UPDATE SET
                extra_bed_selected = excluded.extra_bed_selected,
                ensuite_selected = excluded.ensuite_selected,
                private_study_selected = excluded.private_study_selected,
                updated_at = datetime('now', 'subsec')
            RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(room_id)
        .bind(selection.extra_bed_selected)
        .bind(selection.ensuite_selected)
        .bind(selection.private_study_selected)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(
        pool: &SqlitePool,
        booking_id: Uuid,
        room_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM room_assignments WHERE booking_id = $1 AND room_id = $2")
                .bind(booking_id)
                .bind(room_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}

impl RoomWithAssignment {
    pub async fn find_by_booking_id(
        pool: &SqlitePool,
        booking_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RoomWithAssignmentRow>(
            r#"SELECT
                r.id AS room_id,
                r.room_number,
                rt.name AS room_type_name,
                r.extra_bed_allowed,
                r.ensuite_available,
                r.private_study_available,
                ra.extra_bed_selected,
                ra.ensuite_selected,
                ra.private_study_selected
            FROM room_assignments ra
            JOIN rooms r ON r.id = ra.room_id
            JOIN room_types rt ON rt.id = r.room_type_id
            WHERE ra.booking_id = $1
            ORDER BY r.room_number ASC"#,
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(RoomWithAssignment::from).collect())
    }
}
