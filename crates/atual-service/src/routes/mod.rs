use crate::AppState;
use axum::{Router, routing::get};

pub mod api;
pub mod envelope;
pub mod extract;
pub mod tracking;

async fn health() -> &'static str {
    "OK"
}

pub fn create_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/health", get(health))
        .route("/track/{tracking_id}", get(tracking::track_click::<S>))
        .route(
            "/analytics/summary",
            get(api::analytics::analytics_summary::<S>),
        )
        .nest("/api", api::create_api_router())
}
