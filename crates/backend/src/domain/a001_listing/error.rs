use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Listing not found")]
    NotFound,

    #[error("Invalid status. Must be one of: {0}")]
    InvalidStatus(String),
}
