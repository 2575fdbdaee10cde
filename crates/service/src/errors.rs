use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upload error: {0}")]
    Upload(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Message meant for the client, without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(m) | Self::Forbidden(m) | Self::NotFound(m) | Self::Upload(m) | Self::Db(m) => m.clone(),
            Self::Model(e) => match e {
                models::errors::ModelError::Validation(m) | models::errors::ModelError::Db(m) => m.clone(),
            },
        }
    }
}
