// libs/notification-cell/src/models.rs
use serde::{Deserialize, Serialize};

use shared_models::notification::{NotificationPriority, NotificationType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub doctor_id: i64,
    pub notification_type: NotificationType,
    /// Defaults per type when omitted (risk alerts urgent, lab results
    /// normal); stored verbatim when supplied.
    pub priority: Option<NotificationPriority>,
    pub title: String,
    pub message: String,
    pub related_patient_id: Option<i64>,
    pub related_appointment_id: Option<i64>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error("Notification belongs to another doctor")]
    NotAddressee,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
