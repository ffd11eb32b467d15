use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmiPlannerError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for EmiPlannerError {
    fn from(e: serde_json::Error) -> Self {
        EmiPlannerError::SerializationError(e.to_string())
    }
}
