// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The OTP state machine lives in domains/otp and talks to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseEphemeralStore, BaseSmsService)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Ephemeral Key-Value Store (Infrastructure - TTL-bound string keys)
// =============================================================================

#[async_trait]
pub trait BaseEphemeralStore: Send + Sync {
    /// Stored value, or None if missing or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value that expires after `ttl_seconds`
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Remove keys; absent keys are ignored
    async fn del(&self, keys: &[String]) -> Result<()>;

    /// Atomic increment. A missing key starts at 0, so the first call returns 1.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Reset the remaining TTL on an existing key
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<()>;

    /// Liveness check for /health
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// SMS Trait (Infrastructure - Twilio)
// =============================================================================

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Send a plain-text SMS to an E.164 phone number
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<()>;
}

// =============================================================================
// Email Trait (Infrastructure - SendGrid)
// =============================================================================

/// Outbound email with both plain-text and HTML bodies
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<()>;
}

// =============================================================================
// OTP Generator Trait
// =============================================================================

pub trait BaseOtpGenerator: Send + Sync {
    /// Fixed-length numeric code
    fn generate(&self) -> String;
}

// =============================================================================
// Google Identity Trait (Infrastructure - ID token verification)
// =============================================================================

/// Profile extracted from a verified Google ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    pub email: String,
    pub name: String,
}

#[async_trait]
pub trait BaseGoogleVerifier: Send + Sync {
    /// Verify an ID token and return the profile it was issued for
    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleProfile>;
}
