use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabPricingError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LabPricingError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        LabPricingError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for LabPricingError {
    fn from(e: serde_json::Error) -> Self {
        LabPricingError::SerializationError(e.to_string())
    }
}

impl From<chrono::ParseError> for LabPricingError {
    fn from(e: chrono::ParseError) -> Self {
        LabPricingError::DateError(e.to_string())
    }
}
