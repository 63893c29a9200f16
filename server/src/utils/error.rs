use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::models::DomainError;
use crate::partners::PartnerError;
use crate::repository::RepositoryError;
use crate::services::CheckoutError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Partner error: {0}")]
    PartnerError(String),

    #[error("Partner not configured: {0}")]
    PartnerNotConfigured(String),

    #[error("Incomplete issuance for purchase {intent_id}: {message}")]
    IncompleteIssuance {
        intent_id: Uuid,
        issued: usize,
        message: String,
    },

    #[error("Storage error")]
    StorageError(#[from] RepositoryError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PartnerError(_) => StatusCode::BAD_GATEWAY,
            AppError::PartnerNotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::IncompleteIssuance { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::PartnerError(_) => "PARTNER_ERROR",
            AppError::PartnerNotConfigured(_) => "PARTNER_NOT_CONFIGURED",
            AppError::IncompleteIssuance { .. } => "INCOMPLETE_ISSUANCE",
            AppError::StorageError(_) => "STORAGE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::PartnerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::PartnerNotConfigured(msg) => {
                error!(message = %msg, "Event references a partner with no configured adapter");
            }
            AppError::IncompleteIssuance {
                intent_id,
                issued,
                message,
            } => {
                error!(%intent_id, issued, message = %message, "Purchase needs reconciliation");
            }
            AppError::StorageError(e) => {
                error!(error = ?e, "Storage error");
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        AppError::ValidationError(error.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(error: CheckoutError) -> Self {
        match error {
            CheckoutError::Invalid(e) => e.into(),
            CheckoutError::EventNotFound(id) => {
                AppError::NotFound(format!("Event with id '{}' was not found", id))
            }
            CheckoutError::Partner(PartnerError::UnknownPartner(id)) => {
                AppError::PartnerNotConfigured(format!("No partner configured for id {}", id))
            }
            CheckoutError::Partner(e) => AppError::PartnerError(e.to_string()),
            CheckoutError::Repository(e) => AppError::StorageError(e),
            CheckoutError::IncompleteIssuance {
                intent_id,
                issued,
                cause,
            } => AppError::IncompleteIssuance {
                intent_id,
                issued: issued.len(),
                message: cause.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Only expose high-level message to the client
        let (public_message, details) = match &self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::PartnerError(msg) => (msg.clone(), None),
            AppError::IncompleteIssuance {
                intent_id, issued, ..
            } => (
                "The reservation was accepted by the partner but could not be completed"
                    .to_string(),
                Some(json!({ "intent_id": intent_id, "issued_tickets": issued })),
            ),
            AppError::PartnerNotConfigured(_) => (
                "The event's partner is not available for purchases".to_string(),
                None,
            ),
            AppError::StorageError(_) => ("A storage error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}
