use thiserror::Error;

/// Business errors for token workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("no credential presented")]
    MissingToken,
    #[error("credential rejected: {0}")]
    Rejected(String),
    #[error("token error: {0}")]
    TokenError(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::MissingToken => 1004,
            AuthError::Rejected(_) => 1005,
            AuthError::TokenError(_) => 1102,
        }
    }
}
