// libs/rating-cell/src/lib.rs
//! # Rating Cell
//!
//! Accepts exactly one rating per completed appointment and keeps the owning
//! doctor's average/count aggregate consistent with the underlying rating
//! rows. The duplicate check and the aggregate increment are delegated to a
//! single store transaction, so concurrent submissions cannot double-rate an
//! appointment or lose an increment.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{DoctorRatingSummary, RatingError, SubmitRatingRequest};
pub use router::rating_routes;
pub use services::aggregator::RatingAggregatorService;
