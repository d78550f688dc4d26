//! Operation error categories
//!
//! Every action reports one of a small closed set of failures. Storage
//! details are kept for logs and never shown to callers.

use crate::db::StoreError;
use crate::models::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Bad input (empty comment, identity without email, ...)
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No session on an operation that needs one
    #[error("not signed in")]
    Unauthenticated,

    /// Signed in, but not allowed (self-follow, someone else's post)
    #[error("{reason}")]
    Unauthorized { reason: &'static str },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ActionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Storage(other),
        }
    }
}

impl ActionError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized { .. } => "unauthorized",
            Self::NotFound { .. } => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }

    /// Message safe to show a caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }

    /// Log at the operation boundary: caller mistakes at warn, storage at error.
    pub(crate) fn log(&self, operation: &'static str) {
        match self {
            Self::Storage(e) => tracing::error!(operation, error = %e, "operation failed"),
            other => tracing::warn!(
                operation,
                category = other.category(),
                error = %other,
                "operation rejected"
            ),
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_keeps_category() {
        let err = ActionError::from(StoreError::not_found("post", "abc"));
        assert_eq!(err.category(), "not_found");
        assert_eq!(err.to_string(), "post 'abc' not found");
    }

    #[test]
    fn storage_message_is_generic() {
        let err = ActionError::from(StoreError::Backend("disk on fire".into()));
        assert_eq!(err.category(), "storage_error");
        assert_eq!(err.public_message(), "an internal error occurred");
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn validation_message_passes_through() {
        let err = ActionError::from(ValidationError::Empty { field: "comment content" });
        assert_eq!(err.public_message(), "comment content cannot be empty");
    }
}
