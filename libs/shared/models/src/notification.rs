use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An addressed, classified alert for a doctor. Created unread; the read
/// flag only ever moves forward (unread -> read).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorNotification {
    pub id: i64,
    pub doctor_id: i64,
    pub related_patient_id: Option<i64>,
    pub related_appointment_id: Option<i64>,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    AiRiskAlert,
    AbnormalVitals,
    UrgentMessage,
    LabResults,
    General,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::AiRiskAlert => write!(f, "ai_risk_alert"),
            NotificationType::AbnormalVitals => write!(f, "abnormal_vitals"),
            NotificationType::UrgentMessage => write!(f, "urgent_message"),
            NotificationType::LabResults => write!(f, "lab_results"),
            NotificationType::General => write!(f, "general"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Urgent,
    High,
    Normal,
}

impl NotificationPriority {
    /// Priority used when the producer does not supply one. The dispatcher
    /// stores whatever priority it is given and never reclassifies.
    pub fn default_for(notification_type: &NotificationType) -> Self {
        match notification_type {
            NotificationType::AiRiskAlert => NotificationPriority::Urgent,
            NotificationType::AbnormalVitals => NotificationPriority::High,
            NotificationType::UrgentMessage => NotificationPriority::Urgent,
            NotificationType::LabResults => NotificationPriority::Normal,
            NotificationType::General => NotificationPriority::Normal,
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationPriority::Urgent => write!(f, "urgent"),
            NotificationPriority::High => write!(f, "high"),
            NotificationPriority::Normal => write!(f, "normal"),
        }
    }
}
