pub mod aggregator;

pub use aggregator::RatingAggregatorService;
