use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A doctor-authored order bound to a patient and optionally an appointment.
/// Corrections require a new prescription; there is no amendment path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
    pub medications: Vec<MedicationEntry>,
    pub lab_requests: Vec<LabRequest>,
    pub clinical_notes: Option<String>,
    /// Human-readable identifier (RX-<year>-<monthday>-<sequence>), assigned
    /// once at creation and stable thereafter.
    pub display_id: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub drug_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabRequest {
    pub test_name: String,
    pub test_type: String,
    pub fasting_required: bool,
    pub instructions: Option<String>,
}
