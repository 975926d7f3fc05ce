pub mod appointment;
pub mod auth;
pub mod error;
pub mod notification;
pub mod prescription;
pub mod rating;
