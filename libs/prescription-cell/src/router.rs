// libs/prescription-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn prescription_routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_prescription))
        .route("/{prescription_id}", get(handlers::get_prescription))
        .route("/{prescription_id}/read", post(handlers::mark_prescription_read))
        .route("/patients/{patient_id}", get(handlers::get_patient_prescriptions))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
