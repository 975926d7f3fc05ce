// libs/prescription-cell/src/services/composer.rs
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use shared_models::prescription::Prescription;
use shared_store::{AppState, ClinicStore, NewPrescription};

use crate::models::{CreatePrescriptionRequest, PrescriptionError};

pub struct PrescriptionComposerService {
    store: ClinicStore,
}

impl PrescriptionComposerService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Compose a prescription for the patient. The display identifier is
    /// assigned by the store under the same guard as the insert, so it is
    /// unique even under concurrent creation.
    pub async fn create(
        &self,
        doctor_id: i64,
        request: CreatePrescriptionRequest,
    ) -> Result<Prescription, PrescriptionError> {
        debug!(
            "Composing prescription by doctor {} for patient {}",
            doctor_id, request.patient_id
        );

        if request.medications.is_empty() && request.lab_requests.is_empty() {
            return Err(PrescriptionError::EmptyOrder);
        }

        let prescription = self
            .store
            .insert_prescription(NewPrescription {
                doctor_id,
                patient_id: request.patient_id,
                appointment_id: request.appointment_id,
                medications: request.medications,
                lab_requests: request.lab_requests,
                clinical_notes: request.clinical_notes,
            })
            .await;

        info!(
            "Prescription {} issued as {} for patient {}",
            prescription.id, prescription.display_id, prescription.patient_id
        );
        Ok(prescription)
    }

    pub async fn get(&self, prescription_id: i64) -> Result<Prescription, PrescriptionError> {
        self.store
            .get_prescription(prescription_id)
            .await
            .map_err(|_| PrescriptionError::NotFound)
    }

    /// Patient-side read tracking, forward-only: a no-op when already read.
    pub async fn mark_read(
        &self,
        prescription_id: i64,
        patient_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Prescription, PrescriptionError> {
        let prescription = self.get(prescription_id).await?;

        if prescription.patient_id != patient_id {
            return Err(PrescriptionError::Unauthorized);
        }

        self.store
            .mark_prescription_read(prescription_id, now)
            .await
            .map_err(|_| PrescriptionError::NotFound)
    }

    pub async fn list_for_patient(&self, patient_id: i64) -> Vec<Prescription> {
        self.store.prescriptions_for_patient(patient_id).await
    }
}
