//! Approval checklist and booking status transitions.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::booking::Booking;
use serde::{Deserialize, Serialize};
use services::services::booking_approval::{ApprovalChecklist, ApprovalOutcome};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct RejectBookingRequest {
    pub reason: Option<String>,
}

/// GET /api/bookings/{booking_id}/approval-checklist
pub async fn get_approval_checklist(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<ApprovalChecklist>>, ApiError> {
    let checklist = state.approvals().checklist(booking_id).await?;
    Ok(ResponseJson(ApiResponse::success(checklist)))
}

/// POST /api/bookings/{booking_id}/approve
pub async fn approve_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<ApprovalOutcome>>, ApiError> {
    let outcome = state.approvals().approve(booking_id).await?;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

/// POST /api/bookings/{booking_id}/reject
pub async fn reject_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    axum::Json(payload): axum::Json<RejectBookingRequest>,
) -> Result<ResponseJson<ApiResponse<Booking>>, ApiError> {
    let booking = state.approvals().reject(booking_id, payload.reason).await?;
    Ok(ResponseJson(ApiResponse::success(booking)))
}

/// POST /api/bookings/{booking_id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Booking>>, ApiError> {
    let booking = state.approvals().cancel(booking_id).await?;
    Ok(ResponseJson(ApiResponse::success(booking)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings/{booking_id}/approval-checklist",
            get(get_approval_checklist),
        )
        .route("/bookings/{booking_id}/approve", post(approve_booking))
        .route("/bookings/{booking_id}/reject", post(reject_booking))
        .route("/bookings/{booking_id}/cancel", post(cancel_booking))
}
