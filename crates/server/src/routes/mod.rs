use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod approval;
pub mod bookings;
pub mod meal_jobs;
pub mod rooms;
pub mod spaces;

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(bookings::router())
        .merge(approval::router())
        .merge(rooms::router())
        .merge(meal_jobs::router())
        .merge(spaces::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
