use sea_orm::DbErr;
use thiserror::Error;

use crate::entities::order::Status;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("No {entity} with {id} id was found.")]
    NotFound { entity: &'static str, id: String },
    #[error("Failed to validate: {0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },
    #[error("Category {category_id} cannot be placed under {parent_id}: it would create a cycle")]
    CategoryCycle { category_id: i32, parent_id: i32 },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        StoreError::Validation(crate::models::validation_message(&errors))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_like_api_errors() {
        assert_eq!(
            StoreError::not_found("product", 7).to_string(),
            "No product with 7 id was found."
        );
        assert_eq!(
            StoreError::Validation("name: name is required".into()).to_string(),
            "Failed to validate: name: name is required"
        );
        assert_eq!(
            StoreError::InvalidTransition {
                from: Status::Delivered,
                to: Status::Pending
            }
            .to_string(),
            "Cannot move order from delivered to pending"
        );
    }
}
