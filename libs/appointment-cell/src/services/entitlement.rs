// libs/appointment-cell/src/services/entitlement.rs
use chrono::{DateTime, Duration, Utc};

use shared_config::AppConfig;
use shared_models::appointment::{Appointment, AppointmentStatus};

use crate::models::EntitlementView;

/// Communication entitlement gate.
///
/// Every predicate here is a pure function of (appointment, now). Nothing
/// is persisted: a cancelled appointment closes its chat window on the next
/// read even if `chat_expires_at` still lies in the future, and the video
/// window needs no deactivation job because it was never stored.
#[derive(Debug, Clone, Copy)]
pub struct EntitlementGate {
    window_before: Duration,
    window_after: Duration,
}

impl EntitlementGate {
    pub fn new(window_before_minutes: i64, window_after_minutes: i64) -> Self {
        Self {
            window_before: Duration::minutes(window_before_minutes),
            window_after: Duration::minutes(window_after_minutes),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.video_window_before_minutes,
            config.video_window_after_minutes,
        )
    }

    /// Chat is open while an activated window has not expired and the
    /// appointment has not been cancelled.
    pub fn is_chat_open(&self, appointment: &Appointment, now: DateTime<Utc>) -> bool {
        if appointment.status == AppointmentStatus::Cancelled {
            return false;
        }
        match appointment.chat_expires_at {
            Some(expires_at) => now <= expires_at,
            None => false,
        }
    }

    /// The video call is joinable only around the scheduled instant of a
    /// still-scheduled appointment.
    pub fn is_video_call_active(&self, appointment: &Appointment, now: DateTime<Utc>) -> bool {
        if appointment.status != AppointmentStatus::Scheduled {
            return false;
        }
        let opens_at = appointment.scheduled_at - self.window_before;
        let closes_at = appointment.scheduled_at + self.window_after;
        now >= opens_at && now <= closes_at
    }

    /// Expiry for a chat activation at `now`. Re-activation recomputes from
    /// `now`, it never adds to a previous expiry.
    pub fn chat_expiry_from(now: DateTime<Utc>, expiry_days: i64) -> DateTime<Utc> {
        now + Duration::days(expiry_days)
    }

    pub fn entitlements(&self, appointment: &Appointment, now: DateTime<Utc>) -> EntitlementView {
        EntitlementView {
            chat_open: self.is_chat_open(appointment, now),
            chat_expires_at: appointment.chat_expires_at,
            video_call_active: self.is_video_call_active(appointment, now),
        }
    }
}
