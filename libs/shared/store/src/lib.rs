//! Storage boundary for the clinic engine.
//!
//! Rows live in an arena: they are inserted and transitioned, never
//! physically removed. The store is also where the two uniqueness
//! constraints (one non-cancelled appointment per doctor per slot, one
//! rating per appointment) and the rating-aggregate transaction are
//! enforced, so business correctness does not depend on caller-side
//! mutual exclusion.

pub mod clinic;
pub mod error;

pub use clinic::{
    ClinicStore, NewAppointment, NewDoctorNotification, NewDoctorRating, NewPrescription,
};
pub use error::StoreError;

use shared_config::AppConfig;

/// Shared router state: configuration plus the storage handle.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: ClinicStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: ClinicStore::new(),
        }
    }
}
