// libs/rating-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{RatingError, SubmitRatingRequest};
use crate::services::aggregator::RatingAggregatorService;

fn map_error(error: RatingError) -> AppError {
    match error {
        RatingError::AppointmentNotFound => {
            AppError::NotFound("Appointment not found".to_string())
        }
        RatingError::NotAppointmentOwner => {
            AppError::Forbidden("Only the appointment's patient may rate it".to_string())
        }
        RatingError::AppointmentNotCompleted(status) => AppError::UnprocessableEntity(format!(
            "Appointment cannot be rated in status: {}",
            status
        )),
        RatingError::InvalidStars(stars) => AppError::ValidationError(format!(
            "Rating must be between 1 and 5 stars, got {}",
            stars
        )),
        RatingError::AlreadyRated => {
            AppError::Conflict("This appointment has already been rated".to_string())
        }
        RatingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SubmitRatingRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user
        .subject_id()
        .ok_or_else(|| AppError::Auth("Token subject is not a valid identity".to_string()))?;

    let service = RatingAggregatorService::new(&state);
    let rating = service
        .submit_rating(patient_id, request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "rating": rating,
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_summary(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = RatingAggregatorService::new(&state);
    let summary = service.doctor_summary(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "summary": summary,
    })))
}
