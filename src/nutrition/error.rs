//! Engine error type

use thiserror::Error;

/// Errors raised by calculation and validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    /// A value the caller should have rejected before calling in
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

pub type NutritionResult<T> = Result<T, NutritionError>;

impl NutritionError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        NutritionError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Enum key outside its lookup table
    pub fn unknown_key(field: &'static str, key: &str) -> Self {
        NutritionError::InvalidInput {
            field,
            reason: format!("unrecognized value '{}'", key),
        }
    }
}
