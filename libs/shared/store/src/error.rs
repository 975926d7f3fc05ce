use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(&'static str),

    #[error("Invalid transition for {0}: row already finalized")]
    InvalidTransition(&'static str),
}
