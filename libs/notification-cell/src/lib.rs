// libs/notification-cell/src/lib.rs
//! # Notification Cell
//!
//! Fans out priority-classified clinical alerts to doctors. Producers (risk
//! assessment, vitals monitoring, messaging) classify their own signals; the
//! dispatcher stores what it is given, never deduplicates and never
//! reclassifies. Read state moves forward only: unread -> read, never back.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{NotificationError, NotifyRequest};
pub use router::notification_routes;
pub use services::dispatcher::NotificationDispatcherService;
