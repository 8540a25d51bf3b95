use thiserror::Error;

/// Authentication and authorization failures
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Not authorized")]
    PermissionDenied,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("User no longer exists")]
    UserNoLongerExists,

    #[error("Invalid Google token")]
    InvalidGoogleToken,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Rejected(String),
}
