//! Booking intake and lookup.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    booking::{Booking, BookingStatus, CreateBooking},
    booking_activity::{BookingAction, BookingActivityLog},
};
use serde::Deserialize;
use tracing::info;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
}

fn validate_new_booking(data: &CreateBooking) -> Result<(), ApiError> {
    if data.customer_name.trim().is_empty() || data.event_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "customer name and event name are required".to_string(),
        ));
    }
    if !data.customer_email.contains('@') {
        return Err(ApiError::BadRequest(format!(
            "invalid customer email: {}",
            data.customer_email
        )));
    }
    if data.departure_date < data.arrival_date {
        return Err(ApiError::BadRequest(
            "departure date is before arrival date".to_string(),
        ));
    }
    if data.headcount < 0 {
        return Err(ApiError::BadRequest("headcount cannot be negative".to_string()));
    }
    Ok(())
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Booking>>>, ApiError> {
    let pool = &state.db().pool;
    let bookings = match query.status {
        Some(status) => Booking::find_by_status(pool, status).await?,
        None => Booking::find_all(pool).await?,
    };
    Ok(ResponseJson(ApiResponse::success(bookings)))
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateBooking>,
) -> Result<ResponseJson<ApiResponse<Booking>>, ApiError> {
    validate_new_booking(&payload)?;

    let pool = &state.db().pool;
    let booking = Booking::create(pool, &payload, Uuid::new_v4()).await?;
    BookingActivityLog::create(pool, booking.id, BookingAction::Submitted, None).await?;

    info!(
        booking_id = %booking.id,
        is_overnight = booking.is_overnight,
        catering_required = booking.catering_required,
        "Booking submitted"
    );

    Ok(ResponseJson(ApiResponse::success(booking)))
}

/// GET /api/bookings/{booking_id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Booking>>, ApiError> {
    let booking = Booking::find_by_id(&state.db().pool, booking_id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    Ok(ResponseJson(ApiResponse::success(booking)))
}

/// DELETE /api/bookings/{booking_id}
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = Booking::delete(&state.db().pool, booking_id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound("booking"));
    }
    info!(booking_id = %booking_id, "Booking deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

/// GET /api/bookings/{booking_id}/activity
pub async fn get_booking_activity(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<BookingActivityLog>>>, ApiError> {
    let logs = BookingActivityLog::find_by_booking_id(&state.db().pool, booking_id).await?;
    Ok(ResponseJson(ApiResponse::success(logs)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{booking_id}",
            get(get_booking).delete(delete_booking),
        )
        .route("/bookings/{booking_id}/activity", get(get_booking_activity))
}
