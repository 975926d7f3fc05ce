// libs/notification-cell/src/handlers.rs
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

use crate::models::{NotificationError, NotifyRequest};
use crate::services::dispatcher::NotificationDispatcherService;

fn map_error(error: NotificationError) -> AppError {
    match error {
        NotificationError::NotFound => AppError::NotFound("Notification not found".to_string()),
        NotificationError::NotAddressee => {
            AppError::Forbidden("Notification belongs to another doctor".to_string())
        }
        NotificationError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn doctor_id_from(user: &User) -> Result<i64, AppError> {
    user.subject_id()
        .ok_or_else(|| AppError::Auth("Token subject is not a valid identity".to_string()))
}

/// Producers (risk assessment, vitals monitoring, messaging) post signals
/// here already classified; the dispatcher stores them as given.
#[axum::debug_handler]
pub async fn notify(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<User>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<Value>, AppError> {
    let service = NotificationDispatcherService::new(&state);
    let notification = service.notify(request).await;

    Ok(Json(json!({
        "success": true,
        "notification": notification,
    })))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(notification_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = doctor_id_from(&user)?;

    let service = NotificationDispatcherService::new(&state);
    let notification = service
        .mark_read(notification_id, doctor_id, Utc::now())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "notification": notification,
    })))
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = doctor_id_from(&user)?;

    let service = NotificationDispatcherService::new(&state);
    let marked = service.mark_all_read(doctor_id, Utc::now()).await;

    Ok(Json(json!({
        "success": true,
        "marked": marked,
    })))
}

#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = doctor_id_from(&user)?;

    let service = NotificationDispatcherService::new(&state);
    let count = service.unread_count(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "unread_count": count,
    })))
}

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = doctor_id_from(&user)?;

    let service = NotificationDispatcherService::new(&state);
    let notifications = service.list_for_doctor(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "notifications": notifications,
        "count": notifications.len(),
    })))
}
