//! Service-layer error type and its mapping onto GraphQL errors.
//!
//! Actions return `ServiceError`; resolvers convert it with `into_field_error`,
//! which logs infrastructure failures and hides their details from clients.

use juniper::{FieldError, Object, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::common::auth::AuthError;
use crate::domains::otp::StagingError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("OTP delivery failed")]
    DeliveryFailed(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Internal(e.into())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Machine-readable code placed in the GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "BAD_USER_INPUT",
            ServiceError::Auth(AuthError::PermissionDenied | AuthError::Rejected(_)) => "FORBIDDEN",
            ServiceError::Auth(AuthError::Conflict(_)) => "CONFLICT",
            ServiceError::Auth(_) => "UNAUTHENTICATED",
            ServiceError::Staging(StagingError::TooManyAttempts) => "OTP_LOCKED",
            ServiceError::Staging(StagingError::Store(_)) => "INTERNAL",
            ServiceError::Staging(_) => "OTP_INVALID",
            ServiceError::DeliveryFailed(_) => "DELIVERY_FAILED",
            ServiceError::Internal(_) => "INTERNAL",
        }
    }

    /// Convert into a client-facing GraphQL error, logging by severity
    pub fn into_field_error(self) -> FieldError {
        match &self {
            ServiceError::Internal(e) => error!(error = %e, "Internal error"),
            ServiceError::Staging(StagingError::Store(e)) => {
                error!(error = %e, "Session store failure")
            }
            ServiceError::Staging(StagingError::CorruptedSession(reason)) => {
                error!(reason = %reason, "Corrupted staging session")
            }
            ServiceError::DeliveryFailed(e) => warn!(error = %e, "OTP delivery failed"),
            other => info!(error = %other, "Request rejected"),
        }

        let code = self.code();
        let message = match &self {
            ServiceError::Staging(StagingError::Store(_)) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let mut extensions = Object::with_capacity(1);
        extensions.add_field("code", Value::scalar(code.to_string()));
        FieldError::new(message, Value::Object(extensions))
    }
}
