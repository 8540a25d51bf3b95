use thiserror::Error;

use super::MAX_ATTEMPTS;

/// Failures of a staging session operation.
///
/// `ExpiredOrMissingSession` and `CorruptedSession` render the same client text so
/// a caller cannot tell whether an identifier ever had a session.
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Verification session is invalid or has expired")]
    ExpiredOrMissingSession,

    #[error("Too many incorrect attempts. Request a new OTP.")]
    TooManyAttempts,

    #[error("Incorrect OTP. Attempt {attempt} of {max}", max = MAX_ATTEMPTS)]
    IncorrectCode { attempt: i64 },

    /// The reason is for logs only
    #[error("Verification session is invalid or has expired")]
    CorruptedSession(String),

    #[error("Session store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type StagingResult<T> = std::result::Result<T, StagingError>;
