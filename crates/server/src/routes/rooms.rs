use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::models::{
    booking::Booking,
    room::{AssignmentSelection, Room, RoomAssignment, RoomWithAssignment},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AssignRoomRequest {
    pub room_id: Uuid,
    #[serde(flatten)]
    #[ts(flatten)]
    pub selection: AssignmentSelection,
}

pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Room>>>, ApiError> {
    let rooms = Room::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(rooms)))
}

/// GET /api/bookings/{booking_id}/rooms
pub async fn get_booking_rooms(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<RoomWithAssignment>>>, ApiError> {
    let rooms = RoomWithAssignment::find_by_booking_id(&state.db().pool, booking_id).await?;
    Ok(ResponseJson(ApiResponse::success(rooms)))
}

/// PUT /api/bookings/{booking_id}/rooms
///
/// Allocates a room to the booking. Allocating the same room again replaces
/// the earlier option selection.
pub async fn assign_room(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    axum::Json(payload): axum::Json<AssignRoomRequest>,
) -> Result<ResponseJson<ApiResponse<RoomAssignment>>, ApiError> {
    let pool = &state.db().pool;
    Booking::find_by_id(pool, booking_id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    let room = Room::find_by_id(pool, payload.room_id)
        .await?
        .ok_or(ApiError::NotFound("room"))?;

    let assignment =
        RoomAssignment::upsert(pool, booking_id, room.id, &payload.selection).await?;

    info!(
        booking_id = %booking_id,
        room_number = %room.room_number,
        "Room allocated"
    );

    Ok(ResponseJson(ApiResponse::success(assignment)))
}

/// DELETE /api/bookings/{booking_id}/rooms/{room_id}
pub async fn unassign_room(
    State(state): State<AppState>,
    Path((booking_id, room_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = RoomAssignment::delete(&state.db().pool, booking_id, room_id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound("room assignment"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route(
            "/bookings/{booking_id}/rooms",
            get(get_booking_rooms).put(assign_room),
        )
        .route(
            "/bookings/{booking_id}/rooms/{room_id}",
            delete(unassign_room),
        )
}
