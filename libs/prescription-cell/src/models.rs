// libs/prescription-cell/src/models.rs
use serde::{Deserialize, Serialize};

use shared_models::prescription::{LabRequest, MedicationEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
    #[serde(default)]
    pub medications: Vec<MedicationEntry>,
    #[serde(default)]
    pub lab_requests: Vec<LabRequest>,
    pub clinical_notes: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PrescriptionError {
    #[error("Prescription not found")]
    NotFound,

    #[error("A prescription needs at least one medication or lab request")]
    EmptyOrder,

    #[error("Unauthorized access to prescription")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
