use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuarError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ValuarError {
    fn from(e: serde_json::Error) -> Self {
        ValuarError::SerializationError(e.to_string())
    }
}
