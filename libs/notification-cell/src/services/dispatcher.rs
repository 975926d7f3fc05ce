// libs/notification-cell/src/services/dispatcher.rs
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use shared_models::notification::{DoctorNotification, NotificationPriority};
use shared_store::{AppState, ClinicStore, NewDoctorNotification};

use crate::models::{NotificationError, NotifyRequest};

pub struct NotificationDispatcherService {
    store: ClinicStore,
}

impl NotificationDispatcherService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Create an unread notification for the doctor. Repeated signals each
    /// produce a distinct notification; nothing is deduplicated.
    pub async fn notify(&self, request: NotifyRequest) -> DoctorNotification {
        let priority = request
            .priority
            .unwrap_or_else(|| NotificationPriority::default_for(&request.notification_type));

        let notification = self
            .store
            .insert_notification(NewDoctorNotification {
                doctor_id: request.doctor_id,
                related_patient_id: request.related_patient_id,
                related_appointment_id: request.related_appointment_id,
                notification_type: request.notification_type,
                priority,
                title: request.title,
                message: request.message,
            })
            .await;

        match notification.priority {
            NotificationPriority::Urgent => error!(
                notification_id = %notification.id,
                doctor_id = %notification.doctor_id,
                kind = %notification.notification_type,
                "URGENT notification dispatched: {}",
                notification.title
            ),
            NotificationPriority::High => warn!(
                notification_id = %notification.id,
                doctor_id = %notification.doctor_id,
                kind = %notification.notification_type,
                "High-priority notification dispatched: {}",
                notification.title
            ),
            NotificationPriority::Normal => info!(
                notification_id = %notification.id,
                doctor_id = %notification.doctor_id,
                kind = %notification.notification_type,
                "Notification dispatched: {}",
                notification.title
            ),
        }

        notification
    }

    /// Forward-only: marks unread -> read, a no-op when already read.
    pub async fn mark_read(
        &self,
        notification_id: i64,
        doctor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<DoctorNotification, NotificationError> {
        let notification = self
            .store
            .get_notification(notification_id)
            .await
            .map_err(|_| NotificationError::NotFound)?;

        if notification.doctor_id != doctor_id {
            return Err(NotificationError::NotAddressee);
        }

        self.store
            .mark_notification_read(notification_id, now)
            .await
            .map_err(|_| NotificationError::NotFound)
    }

    /// Marks every unread notification for the doctor; returns how many
    /// actually transitioned.
    pub async fn mark_all_read(&self, doctor_id: i64, now: DateTime<Utc>) -> u64 {
        let marked = self
            .store
            .mark_all_notifications_read(doctor_id, now)
            .await;
        info!("Marked {} notifications read for doctor {}", marked, doctor_id);
        marked
    }

    /// Exact unread count for badge display; reflects every prior mark.
    pub async fn unread_count(&self, doctor_id: i64) -> i64 {
        self.store.unread_notification_count(doctor_id).await
    }

    pub async fn list_for_doctor(&self, doctor_id: i64) -> Vec<DoctorNotification> {
        self.store.notifications_for_doctor(doctor_id).await
    }
}
