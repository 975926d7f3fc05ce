// libs/rating-cell/src/models.rs
use serde::{Deserialize, Serialize};

use shared_models::appointment::AppointmentStatus;
use shared_models::rating::DoctorRating;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRatingRequest {
    pub appointment_id: i64,
    pub stars: i32,
    pub review: Option<String>,
}

/// Presentation read model for a doctor's rating display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRatingSummary {
    pub doctor_id: i64,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub recent_ratings: Vec<DoctorRating>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RatingError {
    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Only the appointment's patient may rate it")]
    NotAppointmentOwner,

    #[error("Appointment cannot be rated in status: {0}")]
    AppointmentNotCompleted(AppointmentStatus),

    #[error("Rating must be between 1 and 5 stars, got {0}")]
    InvalidStars(i32),

    #[error("This appointment has already been rated")]
    AlreadyRated,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
