use assert_matches::assert_matches;
use chrono::Utc;

use prescription_cell::models::{CreatePrescriptionRequest, PrescriptionError};
use prescription_cell::services::composer::PrescriptionComposerService;
use shared_models::prescription::{LabRequest, MedicationEntry};
use shared_utils::test_utils::TestConfig;

fn medication() -> MedicationEntry {
    MedicationEntry {
        drug_name: "Amoxicillin".to_string(),
        dosage: "500mg".to_string(),
        frequency: "3x daily".to_string(),
        duration: "7 days".to_string(),
    }
}

fn lab_request() -> LabRequest {
    LabRequest {
        test_name: "HbA1c".to_string(),
        test_type: "blood".to_string(),
        fasting_required: true,
        instructions: Some("Morning draw preferred".to_string()),
    }
}

fn order(medications: Vec<MedicationEntry>, labs: Vec<LabRequest>) -> CreatePrescriptionRequest {
    CreatePrescriptionRequest {
        patient_id: 100,
        appointment_id: Some(1),
        medications,
        lab_requests: labs,
        clinical_notes: None,
    }
}

#[tokio::test]
async fn creates_a_prescription_with_a_display_id() {
    let state = TestConfig::default().to_state();
    let service = PrescriptionComposerService::new(&state);

    let prescription = service
        .create(7, order(vec![medication()], vec![lab_request()]))
        .await
        .unwrap();

    assert_eq!(prescription.doctor_id, 7);
    assert_eq!(prescription.patient_id, 100);
    assert!(!prescription.is_read);
    assert!(prescription.display_id.starts_with("RX-"));

    // The identifier encodes the creation day and the day's sequence.
    let today = Utc::now().format("%Y-%m%d").to_string();
    assert_eq!(prescription.display_id, format!("RX-{}-0001", today));
}

#[tokio::test]
async fn lab_only_orders_are_valid() {
    let state = TestConfig::default().to_state();
    let service = PrescriptionComposerService::new(&state);

    let prescription = service.create(7, order(vec![], vec![lab_request()])).await.unwrap();
    assert!(prescription.medications.is_empty());
    assert_eq!(prescription.lab_requests.len(), 1);
}

#[tokio::test]
async fn an_empty_order_is_rejected() {
    let state = TestConfig::default().to_state();
    let service = PrescriptionComposerService::new(&state);

    let result = service.create(7, order(vec![], vec![])).await;
    assert_matches!(result, Err(PrescriptionError::EmptyOrder));
}

#[tokio::test]
async fn display_ids_are_unique_and_sequenced() {
    let state = TestConfig::default().to_state();
    let service = PrescriptionComposerService::new(&state);

    let first = service.create(7, order(vec![medication()], vec![])).await.unwrap();
    let second = service.create(7, order(vec![medication()], vec![])).await.unwrap();

    assert_ne!(first.display_id, second.display_id);
    assert!(first.display_id.ends_with("-0001"));
    assert!(second.display_id.ends_with("-0002"));
}

#[tokio::test]
async fn mark_read_is_forward_only_and_owner_scoped() {
    let state = TestConfig::default().to_state();
    let service = PrescriptionComposerService::new(&state);

    let prescription = service.create(7, order(vec![medication()], vec![])).await.unwrap();

    // Only the owning patient marks their copy as read.
    let result = service.mark_read(prescription.id, 200, Utc::now()).await;
    assert_matches!(result, Err(PrescriptionError::Unauthorized));

    let first = service.mark_read(prescription.id, 100, Utc::now()).await.unwrap();
    assert!(first.is_read);
    let read_at = first.read_at.unwrap();

    let second = service.mark_read(prescription.id, 100, Utc::now()).await.unwrap();
    assert!(second.is_read);
    assert_eq!(second.read_at, Some(read_at));
}

#[tokio::test]
async fn lists_patient_prescriptions_newest_first() {
    let state = TestConfig::default().to_state();
    let service = PrescriptionComposerService::new(&state);

    let first = service.create(7, order(vec![medication()], vec![])).await.unwrap();
    let second = service.create(8, order(vec![], vec![lab_request()])).await.unwrap();

    let listed = service.list_for_patient(100).await;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}
