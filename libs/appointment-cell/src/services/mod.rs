pub mod entitlement;
pub mod lifecycle;

pub use entitlement::EntitlementGate;
pub use lifecycle::AppointmentLifecycleService;
