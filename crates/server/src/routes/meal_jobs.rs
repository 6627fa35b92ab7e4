use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::{
    booking::Booking,
    caterer::Caterer,
    meal_job::{CreateMealJob, MealJob, MealJobWithCaterer},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AssignCatererRequest {
    pub caterer_id: Uuid,
}

/// GET /api/bookings/{booking_id}/meal-jobs
pub async fn get_meal_jobs(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<MealJobWithCaterer>>>, ApiError> {
    let jobs = MealJob::find_by_booking_id_with_caterer(&state.db().pool, booking_id).await?;
    Ok(ResponseJson(ApiResponse::success(jobs)))
}

/// POST /api/bookings/{booking_id}/meal-jobs
pub async fn create_meal_job(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateMealJob>,
) -> Result<ResponseJson<ApiResponse<MealJob>>, ApiError> {
    if payload.headcount < 0 {
        return Err(ApiError::BadRequest("headcount cannot be negative".to_string()));
    }

    let pool = &state.db().pool;
    Booking::find_by_id(pool, booking_id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;

    let job = MealJob::create(pool, booking_id, &payload).await?;
    info!(
        booking_id = %booking_id,
        meal_job_id = %job.id,
        meal_type = %job.meal_type,
        "Meal job created"
    );
    Ok(ResponseJson(ApiResponse::success(job)))
}

pub async fn list_caterers(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Caterer>>>, ApiError> {
    let caterers = Caterer::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(caterers)))
}

/// PUT /api/meal-jobs/{meal_job_id}/caterer
pub async fn assign_caterer(
    State(state): State<AppState>,
    Path(meal_job_id): Path<Uuid>,
    axum::Json(payload): axum::Json<AssignCatererRequest>,
) -> Result<ResponseJson<ApiResponse<MealJob>>, ApiError> {
    let pool = &state.db().pool;
    Caterer::find_by_id(pool, payload.caterer_id)
        .await?
        .ok_or(ApiError::NotFound("caterer"))?;

    let job = MealJob::assign_caterer(pool, meal_job_id, payload.caterer_id)
        .await?
        .ok_or(ApiError::NotFound("meal job"))?;
    Ok(ResponseJson(ApiResponse::success(job)))
}

/// DELETE /api/meal-jobs/{meal_job_id}/caterer
pub async fn unassign_caterer(
    State(state): State<AppState>,
    Path(meal_job_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<MealJob>>, ApiError> {
    let job = MealJob::unassign_caterer(&state.db().pool, meal_job_id)
        .await?
        .ok_or(ApiError::NotFound("meal job"))?;
    Ok(ResponseJson(ApiResponse::success(job)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings/{booking_id}/meal-jobs",
            get(get_meal_jobs).post(create_meal_job),
        )
        .route("/caterers", get(list_caterers))
        .route(
            "/meal-jobs/{meal_job_id}/caterer",
            put(assign_caterer).delete(unassign_caterer),
        )
}
