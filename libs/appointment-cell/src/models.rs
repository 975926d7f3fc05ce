// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::appointment::{Appointment, AppointmentStatus, PaymentMethod, PaymentStatus};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateChatRequest {
    /// Falls back to the configured default when omitted.
    pub expiry_days: Option<i64>,
}

/// Read model for the messaging UI: what may be shown right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementView {
    pub chat_open: bool,
    pub chat_expires_at: Option<DateTime<Utc>>,
    pub video_call_active: bool,
}

/// Appointment plus its entitlements, computed at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithEntitlements {
    pub appointment: Appointment,
    pub entitlements: EntitlementView,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Appointment slot conflicts with existing booking")]
    ConflictDetected,

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Cannot complete an appointment before its scheduled time")]
    NotYetCompletable,

    #[error("Appointment was finalized by a concurrent update")]
    ConcurrentlyFinalized,

    #[error("Payment has already been finalized as {0}")]
    PaymentAlreadyFinalized(PaymentStatus),

    #[error("Unauthorized access to appointment")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
