//! Unified error handling for the CRM client.
//!
//! Every failure a caller can see is an [`AppError`]. None of them is fatal:
//! callers show [`AppError::user_message`] and, for store outages, offer a
//! retry.

use serde_json::json;
use thiserror::Error;

use salon_crm_core::{ApiError, ErrorCode};

use crate::db::RepositoryError;
use crate::forms::FormError;
use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Caller-supplied data failed a precondition.
    #[error("Validation error: {message}")]
    Validation {
        /// Stored field name the message refers to, if any.
        field: Option<&'static str>,
        message: String,
    },

    /// The targeted record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The document store could not be reached.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The document store refused access.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The store answered, but with an error or data we cannot read.
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// The message shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::NotFound(_) => "データが見つかりません".to_string(),
            Self::StoreUnavailable(_) => "サービスが一時的に利用できません".to_string(),
            Self::PermissionDenied(_) => "アクセス権限がありません".to_string(),
            Self::Database(_) => "データベースエラーが発生しました".to_string(),
            Self::Unknown(_) => "予期しないエラーが発生しました".to_string(),
        }
    }

    /// Whether the operator should be offered a retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::PermissionDenied(_))
    }

    /// Machine-readable category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::PermissionDenied(_) => ErrorCode::Unauthorized,
            Self::StoreUnavailable(_) | Self::Database(_) | Self::Unknown(_) => {
                ErrorCode::DatabaseError
            }
        }
    }

    /// The error envelope for machine consumers.
    #[must_use]
    pub fn to_api_error(&self) -> ApiError {
        let error = ApiError::new(self.code(), self.user_message());
        match self {
            Self::Validation {
                field: Some(field), ..
            } => error.with_details(json!({ "field": field })),
            Self::StoreUnavailable(_) | Self::PermissionDenied(_) => {
                error.with_details(json!({ "retryable": true }))
            }
            _ => error,
        }
    }

    /// Log the error, capturing server-side failures in Sentry.
    pub fn report(&self) {
        if matches!(
            self,
            Self::StoreUnavailable(_) | Self::Database(_) | Self::Unknown(_)
        ) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "CRM operation failed"
            );
        } else {
            tracing::warn!(error = %self, "CRM operation rejected");
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            StoreError::PermissionDenied(msg) => Self::PermissionDenied(msg),
            StoreError::NotFound(msg) => Self::NotFound(msg),
            other @ (StoreError::Protocol(_) | StoreError::Api { .. }) => {
                Self::Database(other.to_string())
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Store(e) => e.into(),
            RepositoryError::DataCorruption(msg) => Self::Database(msg),
            RepositoryError::NotFound => Self::NotFound("customer".to_string()),
            RepositoryError::Validation(message) => Self::Validation {
                field: None,
                message,
            },
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        Self::Validation {
            field: Some(err.field.name()),
            message: err.message.to_string(),
        }
    }
}
