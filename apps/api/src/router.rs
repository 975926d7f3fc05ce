use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use notification_cell::router::notification_routes;
use prescription_cell::router::prescription_routes;
use rating_cell::router::rating_routes;
use shared_store::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/ratings", rating_routes(state.clone()))
        .nest("/notifications", notification_routes(state.clone()))
        .nest("/prescriptions", prescription_routes(state))
}
