use thiserror::Error;

#[derive(Debug, Error)]
pub enum PitiError {
    #[error("Invalid loan terms: {field} — {reason}")]
    InvalidTerms { field: String, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PitiError {
    fn from(e: serde_json::Error) -> Self {
        PitiError::SerializationError(e.to_string())
    }
}
