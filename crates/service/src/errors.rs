use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::MalformedId(msg) => ServiceError::MalformedInput(msg),
            ModelError::Codec(msg) | ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self {
        ServiceError::Db(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_map_to_service_taxonomy() {
        assert!(matches!(ServiceError::from(ModelError::Validation("x".into())), ServiceError::Validation(_)));
        assert!(matches!(ServiceError::from(ModelError::MalformedId("x".into())), ServiceError::MalformedInput(_)));
        assert!(matches!(ServiceError::from(ModelError::Codec("x".into())), ServiceError::Db(_)));
        assert_eq!(ServiceError::not_found("service").to_string(), "not found: service not found");
    }
}
