use thiserror::Error;

/// Violations of the rules a post must satisfy before it reaches storage.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post rejected: {message}")]
    Validation { message: String },
    #[error("post invariant broken: {message}")]
    Invariant { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }
}
