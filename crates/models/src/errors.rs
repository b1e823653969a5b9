use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("malformed id: {0}")]
    MalformedId(String),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<mongodb::error::Error> for ModelError {
    fn from(e: mongodb::error::Error) -> Self {
        ModelError::Db(e.to_string())
    }
}
