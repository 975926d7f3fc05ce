// libs/prescription-cell/src/lib.rs
//! # Prescription Cell
//!
//! Assembles doctor-authored prescriptions (medications and lab requests)
//! bound to a patient and optionally an appointment. Each prescription gets
//! a human-readable display identifier sequenced per creation day, assigned
//! once and stable forever; corrections are issued as new prescriptions.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CreatePrescriptionRequest, PrescriptionError};
pub use router::prescription_routes;
pub use services::composer::PrescriptionComposerService;
