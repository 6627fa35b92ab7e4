use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    booking::Booking,
    space::{CreateSpaceReservation, Space, SpaceReservation},
};
use tracing::info;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_spaces(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Space>>>, ApiError> {
    let spaces = Space::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(spaces)))
}

/// GET /api/bookings/{booking_id}/space-reservations
pub async fn get_space_reservations(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<SpaceReservation>>>, ApiError> {
    let reservations = SpaceReservation::find_by_booking_id(&state.db().pool, booking_id).await?;
    Ok(ResponseJson(ApiResponse::success(reservations)))
}

/// POST /api/bookings/{booking_id}/space-reservations
///
/// Overlapping reservations are accepted here; they surface as conflicts on
/// the approval checklist.
pub async fn create_space_reservation(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateSpaceReservation>,
) -> Result<ResponseJson<ApiResponse<SpaceReservation>>, ApiError> {
    if payload.starts_at >= payload.ends_at {
        return Err(ApiError::BadRequest(
            "reservation must end after it starts".to_string(),
        ));
    }

    let pool = &state.db().pool;
    Booking::find_by_id(pool, booking_id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    let space = Space::find_by_id(pool, payload.space_id)
        .await?
        .ok_or(ApiError::NotFound("space"))?;

    let reservation = SpaceReservation::create(pool, booking_id, &payload).await?;
    info!(
        booking_id = %booking_id,
        space = %space.name,
        starts_at = %reservation.starts_at,
        ends_at = %reservation.ends_at,
        "Space reserved"
    );
    Ok(ResponseJson(ApiResponse::success(reservation)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/spaces", get(list_spaces)).route(
        "/bookings/{booking_id}/space-reservations",
        get(get_space_reservations).post(create_space_reservation),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use db::models::booking::{AccommodationRequests, CreateBooking};
    use services::services::config::ApprovalGate;

    use super::*;
    use crate::test_support;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 3, hour, 0, 0).unwrap()
    }

    async fn day_booking(state: &AppState, event_name: &str) -> Booking {
        let data = CreateBooking {
            customer_name: "Ada Harper".to_string(),
            customer_email: "ada@example.com".to_string(),
            event_name: event_name.to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
            departure_date: NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
            headcount: 40,
            is_overnight: false,
            catering_required: false,
            accommodation_requests: AccommodationRequests::default(),
            notes: None,
        };
        Booking::create(&state.db().pool, &data, Uuid::new_v4())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_overlapping_reservation_fails_checklist() {
        let state = test_support::state(ApprovalGate::Enforced).await;
        let hall = Space::create(&state.db().pool, "Great Hall").await.unwrap();
        let ours = day_booking(&state, "Choir workshop").await;
        let theirs = day_booking(&state, "Book launch").await;

        for (booking, from, to) in [(&ours, 9, 13), (&theirs, 12, 15)] {
            create_space_reservation(
                State(state.clone()),
                Path(booking.id),
                axum::Json(CreateSpaceReservation {
                    space_id: hall.id,
                    starts_at: at(from),
                    ends_at: at(to),
                }),
            )
            .await
            .unwrap();
        }

        let reservations = get_space_reservations(State(state.clone()), Path(ours.id))
            .await
            .unwrap()
            .0
            .into_data()
            .unwrap();
        assert_eq!(reservations.len(), 1);

        let checklist = state.approvals().checklist(ours.id).await.unwrap();
        assert_eq!(checklist.checks.space_conflicts.conflict_count, 1);
        assert!(!checklist.ready);

        state.approvals().reject(theirs.id, None).await.unwrap();
        let checklist = state.approvals().checklist(ours.id).await.unwrap();
        assert!(checklist.ready);
    }

    #[tokio::test]
    async fn test_rejects_empty_interval() {
        let state = test_support::state(ApprovalGate::Advisory).await;
        let hall = Space::create(&state.db().pool, "Great Hall").await.unwrap();
        let booking = day_booking(&state, "Choir workshop").await;

        let err = create_space_reservation(
            State(state.clone()),
            Path(booking.id),
            axum::Json(CreateSpaceReservation {
                space_id: hall.id,
                starts_at: at(10),
                ends_at: at(10),
            }),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let spaces = list_spaces(State(state)).await.unwrap().0.into_data().unwrap();
        assert_eq!(spaces.len(), 1);
    }
}
