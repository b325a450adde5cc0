use thiserror::Error;

use super::posts::PostId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("cannot sort posts by `{field}`")]
    InvalidField { field: String },
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
    #[error("post `{id}` not found")]
    NotFound { id: PostId },
}

impl DomainError {
    pub fn invalid_field(field: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
        }
    }

    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::MissingFields { fields }
    }

    pub fn not_found(id: PostId) -> Self {
        Self::NotFound { id }
    }
}
