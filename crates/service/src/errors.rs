use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("duplicate code: {0}")]
    DuplicateCode(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("no product id left after {0}")]
    IdsExhausted(u64),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: u64) -> Self { Self::NotFound(format!("{} {} not found", entity, id)) }

    pub fn missing_field(field: &str) -> Self { Self::Validation(format!("field `{}` is required", field)) }
}
