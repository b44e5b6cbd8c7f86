//! Error taxonomy for every gated operation.

use sea_orm::DbErr;
use uuid::Uuid;

use crate::constants::{ERROR_GENERIC_FAILURE, ERROR_NOT_AUTHORIZED, ERROR_NOT_FOUND};
use crate::notifications::Notice;

/// Errors surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Persistence(#[from] DbErr),
}

/// Where the caller should send the user after a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// Re-render the form with the field message.
    Form,
    NotFound,
    Dashboard,
    /// Show a generic failure page.
    Generic,
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn fallback(&self) -> Fallback {
        match self {
            AppError::Validation { .. } => Fallback::Form,
            AppError::NotFound { .. } => Fallback::NotFound,
            AppError::Unauthorized(_) => Fallback::Dashboard,
            AppError::Persistence(_) => Fallback::Generic,
        }
    }

    /// User-facing message. Storage details are never shown.
    pub fn notice(&self) -> Notice {
        match self {
            AppError::Validation { message, .. } => Notice::danger(message.clone()),
            AppError::NotFound { entity, .. } => Notice::warning(format!("{} {}", entity, ERROR_NOT_FOUND)),
            AppError::Unauthorized(message) => Notice::danger(format!("{}: {}", ERROR_NOT_AUTHORIZED, message)),
            AppError::Persistence(_) => Notice::danger(ERROR_GENERIC_FAILURE),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Severity;

    #[test]
    fn unauthorized_falls_back_to_dashboard() {
        let err = AppError::Unauthorized("edit subtask".to_string());
        assert_eq!(err.fallback(), Fallback::Dashboard);
        assert_eq!(err.notice().severity, Severity::Danger);
    }

    #[test]
    fn persistence_message_is_generic() {
        let err = AppError::from(DbErr::Custom("UNIQUE constraint failed: users.email".to_string()));
        let notice = err.notice();
        assert_eq!(notice.message, ERROR_GENERIC_FAILURE);
        assert!(!notice.message.contains("UNIQUE"));
        assert_eq!(err.fallback(), Fallback::Generic);
    }

    #[test]
    fn validation_keeps_field() {
        let err = AppError::validation("name", "too short");
        assert!(matches!(err, AppError::Validation { field: "name", .. }));
        assert_eq!(err.fallback(), Fallback::Form);
    }
}
