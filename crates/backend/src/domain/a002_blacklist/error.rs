use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlacklistError {
    #[error("Invalid blacklist type: {0}")]
    InvalidType(String),

    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("type and value are required")]
    MissingField,

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Entry not found")]
    NotFound,
}
