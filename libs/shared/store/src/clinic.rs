use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shared_models::appointment::{Appointment, AppointmentStatus, PaymentMethod, PaymentStatus};
use shared_models::notification::{DoctorNotification, NotificationPriority, NotificationType};
use shared_models::prescription::{LabRequest, MedicationEntry, Prescription};
use shared_models::rating::{DoctorRating, DoctorRatingAggregate};

use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDoctorRating {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_id: i64,
    pub stars: i32,
    pub review: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDoctorNotification {
    pub doctor_id: i64,
    pub related_patient_id: Option<i64>,
    pub related_appointment_id: Option<i64>,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
    pub medications: Vec<MedicationEntry>,
    pub lab_requests: Vec<LabRequest>,
    pub clinical_notes: Option<String>,
}

#[derive(Default)]
struct StoreInner {
    sequence: i64,
    appointments: HashMap<i64, Appointment>,
    ratings: HashMap<i64, DoctorRating>,
    rating_by_appointment: HashMap<i64, i64>,
    rating_aggregates: HashMap<i64, DoctorRatingAggregate>,
    notifications: HashMap<i64, DoctorNotification>,
    prescriptions: HashMap<i64, Prescription>,
    prescription_day_counts: HashMap<NaiveDate, u32>,
}

impl StoreInner {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Arena-style store over all clinic entities.
///
/// Every check-then-act sequence (slot uniqueness, duplicate-rating
/// rejection, aggregate increment) runs inside a single write guard, which
/// is this store's equivalent of a database uniqueness constraint plus
/// transaction. No guard is ever held across I/O.
#[derive(Clone)]
pub struct ClinicStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
        }
    }

    // ------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------

    /// Insert a new appointment, rejecting a second non-cancelled booking
    /// for the same doctor at the same instant.
    pub async fn insert_appointment(
        &self,
        new: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write().await;

        let slot_taken = inner.appointments.values().any(|existing| {
            existing.doctor_id == new.doctor_id
                && existing.scheduled_at == new.scheduled_at
                && existing.status != AppointmentStatus::Cancelled
        });
        if slot_taken {
            warn!(
                "Slot conflict for doctor {} at {}",
                new.doctor_id, new.scheduled_at
            );
            return Err(StoreError::UniqueViolation("doctor appointment slot"));
        }

        let now = Utc::now();
        let id = inner.next_id();
        let appointment = Appointment {
            id,
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            scheduled_at: new.scheduled_at,
            status: AppointmentStatus::Scheduled,
            payment_method: new.payment_method,
            payment_status: PaymentStatus::Pending,
            chat_expires_at: None,
            notes: new.notes,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        inner.appointments.insert(id, appointment.clone());
        debug!("Inserted appointment {}", id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: i64) -> Result<Appointment, StoreError> {
        let inner = self.inner.read().await;
        inner
            .appointments
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("appointment"))
    }

    /// Replace an appointment row. Terminal statuses and finalized payment
    /// states are guarded here: a stale copy loaded before a concurrent
    /// finalization cannot rewrite them on commit.
    pub async fn update_appointment(
        &self,
        mut appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write().await;
        let current = inner
            .appointments
            .get(&appointment.id)
            .ok_or(StoreError::NotFound("appointment"))?;

        if current.status.is_terminal() && appointment.status != current.status {
            warn!(
                "Rejected status overwrite on terminal appointment {} ({} -> {})",
                appointment.id, current.status, appointment.status
            );
            return Err(StoreError::InvalidTransition("appointment status"));
        }
        if current.payment_status.is_finalized()
            && appointment.payment_status != current.payment_status
        {
            warn!(
                "Rejected payment overwrite on appointment {} ({} -> {})",
                appointment.id, current.payment_status, appointment.payment_status
            );
            return Err(StoreError::InvalidTransition("payment status"));
        }

        appointment.updated_at = Utc::now();
        inner
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    pub async fn appointments_for_patient(&self, patient_id: i64) -> Vec<Appointment> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Appointment> = inner
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.scheduled_at);
        rows
    }

    pub async fn appointments_for_doctor(&self, doctor_id: i64) -> Vec<Appointment> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Appointment> = inner
            .appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.scheduled_at);
        rows
    }

    // ------------------------------------------------------------------
    // Ratings
    // ------------------------------------------------------------------

    /// Insert a rating and bump the owning doctor's aggregate in one
    /// critical section. A concurrent duplicate for the same appointment
    /// observes the uniqueness violation; concurrent ratings for different
    /// appointments of the same doctor both land, neither increment lost.
    pub async fn insert_rating(
        &self,
        new: NewDoctorRating,
    ) -> Result<(DoctorRating, DoctorRatingAggregate), StoreError> {
        let mut inner = self.inner.write().await;

        if inner.rating_by_appointment.contains_key(&new.appointment_id) {
            warn!("Duplicate rating for appointment {}", new.appointment_id);
            return Err(StoreError::UniqueViolation("rating per appointment"));
        }

        let id = inner.next_id();
        let rating = DoctorRating {
            id,
            doctor_id: new.doctor_id,
            patient_id: new.patient_id,
            appointment_id: new.appointment_id,
            stars: new.stars,
            review: new.review,
            created_at: Utc::now(),
        };

        inner.ratings.insert(id, rating.clone());
        inner.rating_by_appointment.insert(new.appointment_id, id);

        let aggregate = inner
            .rating_aggregates
            .entry(new.doctor_id)
            .or_insert_with(|| DoctorRatingAggregate::new(new.doctor_id));
        aggregate.total_stars += new.stars as i64;
        aggregate.total_ratings += 1;
        let aggregate = *aggregate;

        debug!(
            "Inserted rating {} for doctor {} (count now {})",
            id, new.doctor_id, aggregate.total_ratings
        );
        Ok((rating, aggregate))
    }

    pub async fn has_rating_for_appointment(&self, appointment_id: i64) -> bool {
        let inner = self.inner.read().await;
        inner.rating_by_appointment.contains_key(&appointment_id)
    }

    pub async fn ratings_for_doctor(&self, doctor_id: i64) -> Vec<DoctorRating> {
        let inner = self.inner.read().await;
        let mut rows: Vec<DoctorRating> = inner
            .ratings
            .values()
            .filter(|r| r.doctor_id == doctor_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    pub async fn rating_aggregate(&self, doctor_id: i64) -> DoctorRatingAggregate {
        let inner = self.inner.read().await;
        inner
            .rating_aggregates
            .get(&doctor_id)
            .copied()
            .unwrap_or_else(|| DoctorRatingAggregate::new(doctor_id))
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn insert_notification(&self, new: NewDoctorNotification) -> DoctorNotification {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let notification = DoctorNotification {
            id,
            doctor_id: new.doctor_id,
            related_patient_id: new.related_patient_id,
            related_appointment_id: new.related_appointment_id,
            notification_type: new.notification_type,
            priority: new.priority,
            title: new.title,
            message: new.message,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        inner.notifications.insert(id, notification.clone());
        notification
    }

    pub async fn get_notification(&self, id: i64) -> Result<DoctorNotification, StoreError> {
        let inner = self.inner.read().await;
        inner
            .notifications
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("notification"))
    }

    /// Forward-only read marking: a no-op when already read.
    pub async fn mark_notification_read(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<DoctorNotification, StoreError> {
        let mut inner = self.inner.write().await;
        let notification = inner
            .notifications
            .get_mut(&id)
            .ok_or(StoreError::NotFound("notification"))?;
        if !notification.is_read {
            notification.is_read = true;
            notification.read_at = Some(now);
        }
        Ok(notification.clone())
    }

    /// Returns how many notifications transitioned unread -> read.
    pub async fn mark_all_notifications_read(
        &self,
        doctor_id: i64,
        now: DateTime<Utc>,
    ) -> u64 {
        let mut inner = self.inner.write().await;
        let mut marked = 0;
        for notification in inner.notifications.values_mut() {
            if notification.doctor_id == doctor_id && !notification.is_read {
                notification.is_read = true;
                notification.read_at = Some(now);
                marked += 1;
            }
        }
        marked
    }

    pub async fn unread_notification_count(&self, doctor_id: i64) -> i64 {
        let inner = self.inner.read().await;
        inner
            .notifications
            .values()
            .filter(|n| n.doctor_id == doctor_id && !n.is_read)
            .count() as i64
    }

    pub async fn notifications_for_doctor(&self, doctor_id: i64) -> Vec<DoctorNotification> {
        let inner = self.inner.read().await;
        let mut rows: Vec<DoctorNotification> = inner
            .notifications
            .values()
            .filter(|n| n.doctor_id == doctor_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    // ------------------------------------------------------------------
    // Prescriptions
    // ------------------------------------------------------------------

    /// Insert a prescription, assigning the per-day display sequence under
    /// the same guard as the insert so concurrent creations never share a
    /// display id.
    pub async fn insert_prescription(&self, new: NewPrescription) -> Prescription {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let day = now.date_naive();
        let seq = inner.prescription_day_counts.entry(day).or_insert(0);
        *seq += 1;
        let display_id = format_display_id(day, *seq);

        let id = inner.next_id();
        let prescription = Prescription {
            id,
            doctor_id: new.doctor_id,
            patient_id: new.patient_id,
            appointment_id: new.appointment_id,
            medications: new.medications,
            lab_requests: new.lab_requests,
            clinical_notes: new.clinical_notes,
            display_id,
            is_read: false,
            read_at: None,
            created_at: now,
        };
        inner.prescriptions.insert(id, prescription.clone());
        debug!("Inserted prescription {} ({})", id, prescription.display_id);
        prescription
    }

    pub async fn get_prescription(&self, id: i64) -> Result<Prescription, StoreError> {
        let inner = self.inner.read().await;
        inner
            .prescriptions
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("prescription"))
    }

    /// Forward-only read marking: a no-op when already read.
    pub async fn mark_prescription_read(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Prescription, StoreError> {
        let mut inner = self.inner.write().await;
        let prescription = inner
            .prescriptions
            .get_mut(&id)
            .ok_or(StoreError::NotFound("prescription"))?;
        if !prescription.is_read {
            prescription.is_read = true;
            prescription.read_at = Some(now);
        }
        Ok(prescription.clone())
    }

    pub async fn prescriptions_for_patient(&self, patient_id: i64) -> Vec<Prescription> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Prescription> = inner
            .prescriptions
            .values()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }
}

impl Default for ClinicStore {
    fn default() -> Self {
        Self::new()
    }
}

fn format_display_id(day: NaiveDate, sequence: u32) -> String {
    use chrono::Datelike;
    format!(
        "RX-{}-{:02}{:02}-{:04}",
        day.year(),
        day.month(),
        day.day(),
        sequence
    )
}
