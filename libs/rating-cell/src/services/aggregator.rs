// libs/rating-cell/src/services/aggregator.rs
use tracing::{debug, info, warn};

use shared_models::appointment::AppointmentStatus;
use shared_models::rating::DoctorRating;
use shared_store::{AppState, ClinicStore, NewDoctorRating, StoreError};

use crate::models::{DoctorRatingSummary, RatingError, SubmitRatingRequest};

const MIN_STARS: i32 = 1;
const MAX_STARS: i32 = 5;

pub struct RatingAggregatorService {
    store: ClinicStore,
}

impl RatingAggregatorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Submit the patient's rating for a completed appointment.
    ///
    /// The duplicate check, the rating insert and the doctor-aggregate
    /// increment all happen inside one store transaction; two concurrent
    /// submissions for the same appointment race at the storage boundary
    /// and all but the winner observe [`RatingError::AlreadyRated`].
    pub async fn submit_rating(
        &self,
        patient_id: i64,
        request: SubmitRatingRequest,
    ) -> Result<DoctorRating, RatingError> {
        debug!(
            "Rating submission for appointment {} by patient {}",
            request.appointment_id, patient_id
        );

        let appointment = self
            .store
            .get_appointment(request.appointment_id)
            .await
            .map_err(|_| RatingError::AppointmentNotFound)?;

        if appointment.patient_id != patient_id {
            warn!(
                "Patient {} attempted to rate appointment {} owned by patient {}",
                patient_id, appointment.id, appointment.patient_id
            );
            return Err(RatingError::NotAppointmentOwner);
        }

        if appointment.status != AppointmentStatus::Completed {
            return Err(RatingError::AppointmentNotCompleted(appointment.status));
        }

        // An already-rated appointment conflicts before the stars are even
        // looked at; the insert below re-checks under the write guard, so a
        // race between these two points still loses cleanly.
        if self.store.has_rating_for_appointment(appointment.id).await {
            return Err(RatingError::AlreadyRated);
        }

        if !(MIN_STARS..=MAX_STARS).contains(&request.stars) {
            return Err(RatingError::InvalidStars(request.stars));
        }

        let (rating, aggregate) = self
            .store
            .insert_rating(NewDoctorRating {
                doctor_id: appointment.doctor_id,
                patient_id,
                appointment_id: appointment.id,
                stars: request.stars,
                review: request.review,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => RatingError::AlreadyRated,
                StoreError::NotFound(_) => RatingError::AppointmentNotFound,
                other => RatingError::DatabaseError(other.to_string()),
            })?;

        info!(
            "Rating {} recorded for doctor {} (average {:.2} over {})",
            rating.id,
            rating.doctor_id,
            aggregate.average_rating(),
            aggregate.total_ratings
        );
        Ok(rating)
    }

    pub async fn doctor_summary(&self, doctor_id: i64) -> DoctorRatingSummary {
        let aggregate = self.store.rating_aggregate(doctor_id).await;
        let mut recent_ratings = self.store.ratings_for_doctor(doctor_id).await;
        recent_ratings.truncate(10);

        DoctorRatingSummary {
            doctor_id,
            average_rating: aggregate.average_rating(),
            total_ratings: aggregate.total_ratings,
            recent_ratings,
        }
    }
}
