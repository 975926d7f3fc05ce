// libs/prescription-cell/src/handlers.rs
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

use crate::models::{CreatePrescriptionRequest, PrescriptionError};
use crate::services::composer::PrescriptionComposerService;

fn map_error(error: PrescriptionError) -> AppError {
    match error {
        PrescriptionError::NotFound => AppError::NotFound("Prescription not found".to_string()),
        PrescriptionError::EmptyOrder => AppError::ValidationError(
            "A prescription needs at least one medication or lab request".to_string(),
        ),
        PrescriptionError::Unauthorized => {
            AppError::Forbidden("Not authorized to access this prescription".to_string())
        }
        PrescriptionError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn subject_id(user: &User) -> Result<i64, AppError> {
    user.subject_id()
        .ok_or_else(|| AppError::Auth("Token subject is not a valid identity".to_string()))
}

#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    // Prescriptions are doctor-authored.
    if !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only doctors may issue prescriptions".to_string(),
        ));
    }
    let doctor_id = subject_id(&user)?;

    let service = PrescriptionComposerService::new(&state);
    let prescription = service.create(doctor_id, request).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "prescription": prescription,
    })))
}

#[axum::debug_handler]
pub async fn get_prescription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(prescription_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PrescriptionComposerService::new(&state);
    let prescription = service.get(prescription_id).await.map_err(map_error)?;

    let caller = subject_id(&user)?;
    if caller != prescription.patient_id && caller != prescription.doctor_id && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to access this prescription".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "prescription": prescription,
    })))
}

#[axum::debug_handler]
pub async fn mark_prescription_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(prescription_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let patient_id = subject_id(&user)?;

    let service = PrescriptionComposerService::new(&state);
    let prescription = service
        .mark_read(prescription_id, patient_id, Utc::now())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "prescription": prescription,
    })))
}

#[axum::debug_handler]
pub async fn get_patient_prescriptions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let caller = subject_id(&user)?;
    if caller != patient_id && !user.is_admin() && !user.is_doctor() {
        return Err(AppError::Forbidden(
            "Not authorized to view prescriptions for this patient".to_string(),
        ));
    }

    let service = PrescriptionComposerService::new(&state);
    let prescriptions = service.list_for_patient(patient_id).await;

    Ok(Json(json!({
        "success": true,
        "prescriptions": prescriptions,
        "count": prescriptions.len(),
    })))
}
