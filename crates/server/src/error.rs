use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use services::services::booking_approval::BookingApprovalError;
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BookingApproval(#[from] BookingApprovalError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BookingApproval(e) => match e {
                BookingApprovalError::NotFound => StatusCode::NOT_FOUND,
                BookingApprovalError::InvalidStatus { .. }
                | BookingApprovalError::ChecklistFailed(_) => StatusCode::CONFLICT,
                BookingApprovalError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            ApiError::BookingApproval(BookingApprovalError::ChecklistFailed(checks)) => {
                let message = "Booking is not ready for approval";
                (
                    status,
                    ResponseJson(ApiResponse::<(), _>::error_with_data(message, checks)),
                )
                    .into_response()
            }
            ApiError::Database(ref e)
            | ApiError::BookingApproval(BookingApprovalError::Database(ref e)) => {
                error!(error = %e, "Database error while handling request");
                (
                    status,
                    ResponseJson(ApiResponse::<()>::error("Internal database error")),
                )
                    .into_response()
            }
            other => {
                let message = other.to_string();
                (status, ResponseJson(ApiResponse::<()>::error(&message))).into_response()
            }
        }
    }
}
