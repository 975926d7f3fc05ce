// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use shared_models::appointment::{Appointment, AppointmentStatus, PaymentStatus};
use shared_store::{AppState, ClinicStore, NewAppointment, StoreError};

use crate::models::{AppointmentError, AppointmentWithEntitlements, BookAppointmentRequest};
use crate::services::entitlement::EntitlementGate;

pub struct AppointmentLifecycleService {
    store: ClinicStore,
    gate: EntitlementGate,
    default_chat_expiry_days: i64,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            gate: EntitlementGate::from_config(&state.config),
            default_chat_expiry_days: state.config.default_chat_expiry_days,
        }
    }

    /// Book a consultation slot. The doctor+slot uniqueness check happens at
    /// the storage boundary, so a concurrent booking race is decided there.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} at {}",
            request.patient_id, request.doctor_id, request.scheduled_at
        );

        if request.scheduled_at <= Utc::now() {
            warn!("Rejected booking in the past: {}", request.scheduled_at);
            return Err(AppointmentError::InvalidTime(
                "Please select a future time slot".to_string(),
            ));
        }

        let appointment = self
            .store
            .insert_appointment(NewAppointment {
                patient_id: request.patient_id,
                doctor_id: request.doctor_id,
                scheduled_at: request.scheduled_at,
                payment_method: request.payment_method,
                notes: request.notes,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AppointmentError::ConflictDetected,
                StoreError::NotFound(_) => AppointmentError::NotFound,
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        info!("Appointment {} booked successfully", appointment.id);
        Ok(appointment)
    }

    /// Pending -> Paid or Pending -> Failed. Paid and Failed are final.
    pub async fn confirm_payment(
        &self,
        appointment_id: i64,
        success: bool,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Confirming payment for appointment {}", appointment_id);

        let mut appointment = self.get(appointment_id).await?;

        if appointment.payment_status.is_finalized() {
            warn!(
                "Payment for appointment {} already finalized as {}",
                appointment_id, appointment.payment_status
            );
            return Err(AppointmentError::PaymentAlreadyFinalized(
                appointment.payment_status,
            ));
        }

        appointment.payment_status = if success {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Failed
        };

        let appointment = self.persist(appointment).await?;
        info!(
            "Payment for appointment {} finalized as {}",
            appointment_id, appointment.payment_status
        );
        Ok(appointment)
    }

    /// Scheduled -> Completed, only once the scheduled instant has passed.
    /// Completion unlocks rating eligibility for the patient.
    pub async fn complete(
        &self,
        appointment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Completing appointment {}", appointment_id);

        let mut appointment = self.get(appointment_id).await?;
        self.validate_transition(&appointment, AppointmentStatus::Completed)?;

        // Completing early is a state-level violation, not a malformed input.
        if now < appointment.scheduled_at {
            warn!(
                "Attempt to complete future appointment {} (scheduled {})",
                appointment_id, appointment.scheduled_at
            );
            return Err(AppointmentError::NotYetCompletable);
        }

        appointment.status = AppointmentStatus::Completed;
        let appointment = self.persist(appointment).await?;
        info!("Appointment {} completed", appointment_id);
        Ok(appointment)
    }

    /// Scheduled -> Cancelled. Closes any open chat window immediately by
    /// clearing the expiry; the video window closes by the status predicate.
    pub async fn cancel(
        &self,
        appointment_id: i64,
        reason: String,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment {}", appointment_id);

        let mut appointment = self.get(appointment_id).await?;
        self.validate_transition(&appointment, AppointmentStatus::Cancelled)?;

        appointment.status = AppointmentStatus::Cancelled;
        appointment.cancellation_reason = Some(reason);
        appointment.chat_expires_at = None;

        let appointment = self.persist(appointment).await?;
        info!("Appointment {} cancelled", appointment_id);
        Ok(appointment)
    }

    /// Open (or re-open) the patient-doctor chat window. Re-activation
    /// extends the expiry from `now`, never from the previous expiry.
    pub async fn activate_chat(
        &self,
        appointment_id: i64,
        expiry_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.get(appointment_id).await?;

        if appointment.status == AppointmentStatus::Cancelled {
            warn!(
                "Chat activation rejected for cancelled appointment {}",
                appointment_id
            );
            return Err(AppointmentError::InvalidStatusTransition(
                appointment.status,
            ));
        }

        let days = expiry_days.unwrap_or(self.default_chat_expiry_days);
        if days <= 0 {
            return Err(AppointmentError::InvalidTime(
                "Chat expiry must be at least one day".to_string(),
            ));
        }

        appointment.chat_expires_at = Some(EntitlementGate::chat_expiry_from(now, days));
        let appointment = self.persist(appointment).await?;
        info!(
            "Chat for appointment {} open until {:?}",
            appointment_id, appointment.chat_expires_at
        );
        Ok(appointment)
    }

    pub async fn get(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.store
            .get_appointment(appointment_id)
            .await
            .map_err(|_| AppointmentError::NotFound)
    }

    pub async fn get_with_entitlements(
        &self,
        appointment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppointmentWithEntitlements, AppointmentError> {
        let appointment = self.get(appointment_id).await?;
        let entitlements = self.gate.entitlements(&appointment, now);
        Ok(AppointmentWithEntitlements {
            appointment,
            entitlements,
        })
    }

    pub async fn list_for_patient(&self, patient_id: i64) -> Vec<Appointment> {
        self.store.appointments_for_patient(patient_id).await
    }

    pub async fn list_for_doctor(&self, doctor_id: i64) -> Vec<Appointment> {
        self.store.appointments_for_doctor(doctor_id).await
    }

    pub fn gate(&self) -> &EntitlementGate {
        &self.gate
    }

    fn validate_transition(
        &self,
        appointment: &Appointment,
        next: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if !appointment.status.can_transition_to(&next) {
            warn!(
                "Invalid status transition attempted on appointment {}: {} -> {}",
                appointment.id, appointment.status, next
            );
            return Err(AppointmentError::InvalidStatusTransition(
                appointment.status,
            ));
        }
        Ok(())
    }

    async fn persist(&self, appointment: Appointment) -> Result<Appointment, AppointmentError> {
        self.store
            .update_appointment(appointment)
            .await
            .map_err(|e| match e {
                // The store refused to rewrite a row another writer finalized
                // between our read and this commit.
                StoreError::InvalidTransition(_) => AppointmentError::ConcurrentlyFinalized,
                StoreError::NotFound(_) => AppointmentError::NotFound,
                other => AppointmentError::DatabaseError(other.to_string()),
            })
    }
}
