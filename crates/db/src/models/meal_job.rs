use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MealType {
    Breakfast,
    MorningTea,
    Lunch,
    AfternoonTea,
    Dinner,
    Supper,
}

/// One catered meal for one booking on one date
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MealJob {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub meal_type: MealType,
    pub service_date: NaiveDate,
    pub headcount: i32,
    pub assigned_caterer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MealJob {
    pub fn is_assigned(&self) -> bool {
        self.assigned_caterer_id.is_some()
    }
}

/// Meal job joined with the assigned caterer's name
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MealJobWithCaterer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub meal_job: MealJob,
    pub caterer_name: Option<String>,
}

impl std::ops::Deref for MealJobWithCaterer {
    type Target = MealJob;
    fn deref(&self) -> &Self::Target {
        &self.meal_job
    }
}

impl std::borrow::Borrow<MealJob> for MealJobWithCaterer {
    fn borrow(&self) -> &MealJob {
        &self.meal_job
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMealJob {
    pub meal_type: MealType,
    pub service_date: NaiveDate,
    pub headcount: i32,
}

impl MealJob {
    pub async fn create(
        pool: &SqlitePool,
        booking_id: Uuid,
        data: &CreateMealJob,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, MealJob>(
            r#"INSERT INTO meal_jobs (id, booking_id, meal_type, service_date, headcount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(data.meal_type)
        .bind(data.service_date)
        .bind(data.headcount)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MealJob>("SELECT * FROM meal_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_booking_id(
        pool: &SqlitePool,
        booking_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MealJob>(
            r#"SELECT * FROM meal_jobs
            WHERE booking_id = $1
            ORDER BY service_date ASC, created_at ASC"#,
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_booking_id_with_caterer(
        pool: &SqlitePool,
        booking_id: Uuid,
    ) -> Result<Vec<MealJobWithCaterer>, sqlx::Error> {
        sqlx::query_as::<_, MealJobWithCaterer>(
            r#"SELECT mj.*, c.name AS caterer_name
            FROM meal_jobs mj
            LEFT JOIN caterers c ON c.id = mj.assigned_caterer_id
            WHERE mj.booking_id = $1
            ORDER BY mj.service_date ASC, mj.created_at ASC"#,
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await
    }

    pub async fn assign_caterer(
        pool: &SqlitePool,
        id: Uuid,
        caterer_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        Self::set_caterer(pool, id, Some(caterer_id)).await
    }

    pub async fn unassign_caterer(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        Self::set_caterer(pool, id, None).await
    }

    async fn set_caterer(
        pool: &SqlitePool,
        id: Uuid,
        caterer_id: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MealJob>(
            r#"UPDATE meal_jobs
            SET assigned_caterer_id = $2,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(caterer_id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DBService,
        models::{
            booking::{Booking, tests::sample_booking},
            caterer::Caterer,
        },
    };

    #[tokio::test]
    async fn test_assign_and_enrich_meal_jobs() {
        let db = DBService::new_in_memory().await.unwrap();
        let booking_id = Uuid::new_v4();
        Booking::create(&db.pool, &sample_booking(false), booking_id)
            .await
            .unwrap();
        let caterer = Caterer::create(&db.pool, "Hearth & Co", "kitchen@hearth.example")
            .await
            .unwrap();

        let service_date = NaiveDate::from_ymd_opt(2026, 7, 3).unwrap();
        let lunch = MealJob::create(
            &db.pool,
            booking_id,
            &CreateMealJob {
                meal_type: MealType::Lunch,
                service_date,
                headcount: 24,
            },
        )
        .await
        .unwrap();
        MealJob::create(
            &db.pool,
            booking_id,
            &CreateMealJob {
                meal_type: MealType::Dinner,
                service_date,
                headcount: 24,
            },
        )
        .await
        .unwrap();
        assert!(!lunch.is_assigned());

        let assigned = MealJob::assign_caterer(&db.pool, lunch.id, caterer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assigned.assigned_caterer_id, Some(caterer.id));

        let jobs = MealJob::find_by_booking_id_with_caterer(&db.pool, booking_id)
            .await
            .unwrap();
        assert_eq!(jobs.len(), 2);
        let lunch_row = jobs.iter().find(|j| j.id == lunch.id).unwrap();
        assert_eq!(lunch_row.caterer_name.as_deref(), Some("Hearth & Co"));
        let dinner_row = jobs.iter().find(|j| j.id != lunch.id).unwrap();
        assert!(dinner_row.caterer_name.is_none());
        assert!(!dinner_row.is_assigned());

        let cleared = MealJob::unassign_caterer(&db.pool, lunch.id)
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.assigned_caterer_id.is_none());
    }
}
