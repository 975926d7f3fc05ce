// libs/appointment-cell/src/lib.rs
//! # Appointment Cell
//!
//! Owns the appointment lifecycle (booking, payment confirmation,
//! completion, cancellation) and the communication entitlement gate that
//! derives chat and video-call access from appointment state and the
//! current instant.
//!
//! The lifecycle is a three-state machine: Scheduled is initial, Completed
//! and Cancelled are terminal and mutually exclusive. Entitlements are pure
//! predicates over (appointment, now) and are recomputed on every read
//! rather than persisted, so there is no stale flag to keep in sync.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    ActivateChatRequest, AppointmentError, AppointmentWithEntitlements,
    BookAppointmentRequest, CancelAppointmentRequest, ConfirmPaymentRequest, EntitlementView,
};
pub use router::appointment_routes;
pub use services::entitlement::EntitlementGate;
pub use services::lifecycle::AppointmentLifecycleService;
