use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Field '{field}' is already defined on model '{model}'")]
    DuplicateField { model: String, field: String },

    #[error("Split attribute '{0}' must declare at least one segment")]
    EmptySegments(String),

    #[error("Missing `prefixes` or `suffixes` for '{0}'")]
    MissingLayout(String),

    #[error("Both `prefixes` and `suffixes` given for '{0}'")]
    ConflictingLayout(String),

    #[error("Segment '{segment}' needs a positive length, got {length}")]
    InvalidLength { segment: String, length: u32 },

    #[error("Unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("No split attribute '{attribute}' on model '{model}'")]
    UnknownAttribute { model: String, attribute: String },

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] formtags::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SplitterError>;
