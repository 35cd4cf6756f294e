use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} must be positive")]
    NonPositive { field: String },

    #[error("{field} is out of range")]
    OutOfRange { field: String },

    #[error("{field} must look like {expected}")]
    BadFormat { field: String, expected: String },

    #[error("A lead needs at least a name, email, or phone")]
    MissingContact,

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown lead status: {0}")]
    UnknownStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type CrmResult<T> = Result<T, CrmError>;

impl CrmError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        CrmError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}
