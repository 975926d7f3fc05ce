use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One evaluation of a doctor for a specific appointment. Immutable once
/// created; at most one rating may exist per appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRating {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_id: i64,
    pub stars: i32,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Denormalized per-doctor rating counters. The average is derived from the
/// counters on read rather than stored, so it cannot drift from them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DoctorRatingAggregate {
    pub doctor_id: i64,
    pub total_stars: i64,
    pub total_ratings: i64,
}

impl DoctorRatingAggregate {
    pub fn new(doctor_id: i64) -> Self {
        Self { doctor_id, total_stars: 0, total_ratings: 0 }
    }

    /// Arithmetic mean of all stars, rounded to two decimals. Zero when the
    /// doctor has no ratings yet.
    pub fn average_rating(&self) -> f64 {
        if self.total_ratings == 0 {
            return 0.0;
        }
        let mean = self.total_stars as f64 / self.total_ratings as f64;
        (mean * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_is_zero_without_ratings() {
        assert_eq!(DoctorRatingAggregate::new(1).average_rating(), 0.0);
    }

    #[test]
    fn average_is_rounded_mean() {
        let aggregate = DoctorRatingAggregate { doctor_id: 1, total_stars: 17, total_ratings: 4 };
        assert_eq!(aggregate.average_rating(), 4.25);

        let aggregate = DoctorRatingAggregate { doctor_id: 1, total_stars: 10, total_ratings: 3 };
        assert_eq!(aggregate.average_rating(), 3.33);
    }
}
