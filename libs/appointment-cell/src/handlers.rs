// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{
    ActivateChatRequest, AppointmentError, BookAppointmentRequest, CancelAppointmentRequest,
    ConfirmPaymentRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

fn map_error(error: AppointmentError) -> AppError {
    match error {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::InvalidTime(msg) => AppError::ValidationError(msg),
        AppointmentError::ConflictDetected => AppError::Conflict(
            "This time slot is already booked for the selected doctor".to_string(),
        ),
        AppointmentError::InvalidStatusTransition(status) => AppError::UnprocessableEntity(
            format!("Appointment cannot be modified in current status: {}", status),
        ),
        AppointmentError::NotYetCompletable => AppError::UnprocessableEntity(
            "Cannot complete a future appointment".to_string(),
        ),
        AppointmentError::ConcurrentlyFinalized => AppError::Conflict(
            "Appointment was finalized by a concurrent update".to_string(),
        ),
        AppointmentError::PaymentAlreadyFinalized(status) => AppError::UnprocessableEntity(
            format!("Payment has already been finalized as {}", status),
        ),
        AppointmentError::Unauthorized => {
            AppError::Forbidden("Not authorized to access this appointment".to_string())
        }
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn is_self(user: &User, id: i64) -> bool {
    user.subject_id() == Some(id)
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    // Patients book for themselves; clinic staff may book on their behalf.
    if !is_self(&user, request.patient_id) && !user.is_admin() && !user.is_doctor() {
        return Err(AppError::Forbidden(
            "Not authorized to book appointment for this patient".to_string(),
        ));
    }

    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.book(request).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let view = service
        .get_with_entitlements(appointment_id, Utc::now())
        .await
        .map_err(map_error)?;

    let appointment = &view.appointment;
    if !is_self(&user, appointment.patient_id)
        && !is_self(&user, appointment.doctor_id)
        && !user.is_admin()
    {
        return Err(AppError::Forbidden(
            "Not authorized to access this appointment".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "appointment": view.appointment,
        "entitlements": view.entitlements,
    })))
}

#[axum::debug_handler]
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.get(appointment_id).await.map_err(map_error)?;

    if !is_self(&user, appointment.patient_id) && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to confirm payment for this appointment".to_string(),
        ));
    }

    let appointment = service
        .confirm_payment(appointment_id, request.success)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.get(appointment_id).await.map_err(map_error)?;

    // Only the treating doctor (or an admin) may close out a consultation.
    if !is_self(&user, appointment.doctor_id) && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to complete this appointment".to_string(),
        ));
    }

    let appointment = service
        .complete(appointment_id, Utc::now())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.get(appointment_id).await.map_err(map_error)?;

    if !is_self(&user, appointment.patient_id)
        && !is_self(&user, appointment.doctor_id)
        && !user.is_admin()
    {
        return Err(AppError::Forbidden(
            "Not authorized to cancel this appointment".to_string(),
        ));
    }

    let appointment = service
        .cancel(appointment_id, request.reason)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn activate_chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<ActivateChatRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.get(appointment_id).await.map_err(map_error)?;

    if !is_self(&user, appointment.patient_id)
        && !is_self(&user, appointment.doctor_id)
        && !user.is_admin()
    {
        return Err(AppError::Forbidden(
            "Not authorized to activate chat for this appointment".to_string(),
        ));
    }

    let appointment = service
        .activate_chat(appointment_id, request.expiry_days, Utc::now())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn get_entitlements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let view = service
        .get_with_entitlements(appointment_id, Utc::now())
        .await
        .map_err(map_error)?;

    if !is_self(&user, view.appointment.patient_id)
        && !is_self(&user, view.appointment.doctor_id)
        && !user.is_admin()
    {
        return Err(AppError::Forbidden(
            "Not authorized to access this appointment".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "entitlements": view.entitlements,
    })))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !is_self(&user, patient_id) && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view appointments for this patient".to_string(),
        ));
    }

    let service = AppointmentLifecycleService::new(&state);
    let appointments = service.list_for_patient(patient_id).await;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
        "count": appointments.len(),
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !is_self(&user, doctor_id) && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view appointments for this doctor".to_string(),
        ));
    }

    let service = AppointmentLifecycleService::new(&state);
    let appointments = service.list_for_doctor(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
        "count": appointments.len(),
    })))
}
