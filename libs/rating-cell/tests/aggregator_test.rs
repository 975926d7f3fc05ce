use assert_matches::assert_matches;
use chrono::{Duration, Utc};

use rating_cell::models::{RatingError, SubmitRatingRequest};
use rating_cell::services::aggregator::RatingAggregatorService;
use shared_models::appointment::{Appointment, AppointmentStatus, PaymentMethod};
use shared_store::{ClinicStore, NewAppointment};
use shared_utils::test_utils::TestConfig;

async fn scheduled_appointment(
    store: &ClinicStore,
    patient_id: i64,
    doctor_id: i64,
    slot_offset_hours: i64,
) -> Appointment {
    store
        .insert_appointment(NewAppointment {
            patient_id,
            doctor_id,
            scheduled_at: Utc::now() + Duration::hours(slot_offset_hours),
            payment_method: PaymentMethod::Card,
            notes: None,
        })
        .await
        .unwrap()
}

async fn completed_appointment(
    store: &ClinicStore,
    patient_id: i64,
    doctor_id: i64,
    slot_offset_hours: i64,
) -> Appointment {
    let mut appointment =
        scheduled_appointment(store, patient_id, doctor_id, slot_offset_hours).await;
    appointment.status = AppointmentStatus::Completed;
    store.update_appointment(appointment).await.unwrap()
}

fn rating(appointment_id: i64, stars: i32) -> SubmitRatingRequest {
    SubmitRatingRequest {
        appointment_id,
        stars,
        review: None,
    }
}

#[tokio::test]
async fn rating_a_completed_appointment_updates_the_aggregate() {
    let state = TestConfig::default().to_state();
    let service = RatingAggregatorService::new(&state);

    // Seed doctor 7 with three 4-star ratings: average 4.0, count 3.
    for i in 0..3i64 {
        let appointment = completed_appointment(&state.store, 100 + i, 7, 24 + i).await;
        service
            .submit_rating(appointment.patient_id, rating(appointment.id, 4))
            .await
            .unwrap();
    }
    let summary = service.doctor_summary(7).await;
    assert_eq!(summary.average_rating, 4.0);
    assert_eq!(summary.total_ratings, 3);

    // A fourth 5-star rating moves the aggregate to (4.25, 4).
    let appointment = completed_appointment(&state.store, 103, 7, 72).await;
    service
        .submit_rating(103, rating(appointment.id, 5))
        .await
        .unwrap();

    let summary = service.doctor_summary(7).await;
    assert_eq!(summary.average_rating, 4.25);
    assert_eq!(summary.total_ratings, 4);
}

#[tokio::test]
async fn rating_a_missing_appointment_is_not_found() {
    let state = TestConfig::default().to_state();
    let service = RatingAggregatorService::new(&state);

    let result = service.submit_rating(100, rating(9999, 5)).await;
    assert_matches!(result, Err(RatingError::AppointmentNotFound));
}

#[tokio::test]
async fn only_the_owning_patient_may_rate() {
    let state = TestConfig::default().to_state();
    let service = RatingAggregatorService::new(&state);

    let appointment = completed_appointment(&state.store, 100, 7, 24).await;
    let result = service.submit_rating(200, rating(appointment.id, 5)).await;
    assert_matches!(result, Err(RatingError::NotAppointmentOwner));
}

#[tokio::test]
async fn scheduled_and_cancelled_appointments_cannot_be_rated() {
    let state = TestConfig::default().to_state();
    let service = RatingAggregatorService::new(&state);

    let scheduled = scheduled_appointment(&state.store, 100, 7, 24).await;
    let result = service.submit_rating(100, rating(scheduled.id, 5)).await;
    assert_matches!(
        result,
        Err(RatingError::AppointmentNotCompleted(AppointmentStatus::Scheduled))
    );

    let mut cancelled = scheduled_appointment(&state.store, 100, 7, 48).await;
    cancelled.status = AppointmentStatus::Cancelled;
    let cancelled = state.store.update_appointment(cancelled).await.unwrap();
    let result = service.submit_rating(100, rating(cancelled.id, 5)).await;
    assert_matches!(
        result,
        Err(RatingError::AppointmentNotCompleted(AppointmentStatus::Cancelled))
    );
}

#[tokio::test]
async fn stars_outside_one_to_five_are_rejected() {
    let state = TestConfig::default().to_state();
    let service = RatingAggregatorService::new(&state);

    let appointment = completed_appointment(&state.store, 100, 7, 24).await;
    assert_matches!(
        service.submit_rating(100, rating(appointment.id, 0)).await,
        Err(RatingError::InvalidStars(0))
    );
    assert_matches!(
        service.submit_rating(100, rating(appointment.id, 6)).await,
        Err(RatingError::InvalidStars(6))
    );
    // Nothing was recorded for the doctor.
    assert_eq!(service.doctor_summary(7).await.total_ratings, 0);
}

#[tokio::test]
async fn a_second_rating_for_the_same_appointment_conflicts() {
    let state = TestConfig::default().to_state();
    let service = RatingAggregatorService::new(&state);

    let appointment = completed_appointment(&state.store, 100, 7, 24).await;
    service
        .submit_rating(100, rating(appointment.id, 5))
        .await
        .unwrap();

    let result = service.submit_rating(100, rating(appointment.id, 1)).await;
    assert_matches!(result, Err(RatingError::AlreadyRated));

    let summary = service.doctor_summary(7).await;
    assert_eq!(summary.total_ratings, 1);
    assert_eq!(summary.average_rating, 5.0);
}

#[tokio::test]
async fn duplicate_wins_over_invalid_stars() {
    let state = TestConfig::default().to_state();
    let service = RatingAggregatorService::new(&state);

    let appointment = completed_appointment(&state.store, 100, 7, 24).await;
    service
        .submit_rating(100, rating(appointment.id, 5))
        .await
        .unwrap();

    // The duplicate is reported even when the resubmission's stars are also
    // out of range: the appointment's rated-ness is checked first.
    let result = service.submit_rating(100, rating(appointment.id, 0)).await;
    assert_matches!(result, Err(RatingError::AlreadyRated));
}

#[tokio::test]
async fn concurrent_duplicates_leave_exactly_one_rating() {
    let state = TestConfig::default().to_state();
    let appointment = completed_appointment(&state.store, 100, 7, 24).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        let appointment_id = appointment.id;
        handles.push(tokio::spawn(async move {
            let service = RatingAggregatorService::new(&state);
            service.submit_rating(100, rating(appointment_id, 5)).await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(RatingError::AlreadyRated) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    let service = RatingAggregatorService::new(&state);
    assert_eq!(service.doctor_summary(7).await.total_ratings, 1);
}

#[tokio::test]
async fn concurrent_ratings_for_different_appointments_never_lose_an_increment() {
    let state = TestConfig::default().to_state();

    let mut handles = Vec::new();
    for i in 0..10i64 {
        let appointment = completed_appointment(&state.store, 100 + i, 7, 24 + i).await;
        let state = state.clone();
        let stars = (i % 5 + 1) as i32;
        handles.push(tokio::spawn(async move {
            let service = RatingAggregatorService::new(&state);
            service
                .submit_rating(appointment.patient_id, rating(appointment.id, stars))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let service = RatingAggregatorService::new(&state);
    let summary = service.doctor_summary(7).await;
    assert_eq!(summary.total_ratings, 10);

    // stars were 1,2,3,4,5 twice over: mean 3.0
    assert_eq!(summary.average_rating, 3.0);

    // The aggregate matches the underlying rows exactly.
    let rows = state.store.ratings_for_doctor(7).await;
    assert_eq!(rows.len() as i64, summary.total_ratings);
    let mean = rows.iter().map(|r| r.stars as f64).sum::<f64>() / rows.len() as f64;
    assert!((summary.average_rating - mean).abs() < 0.005);
}
