use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
}

impl ModelError {
    /// Message without the `validation error:` prefix, as shown to API callers.
    pub fn message(&self) -> &str {
        match self {
            ModelError::Validation(m) => m,
        }
    }
}
