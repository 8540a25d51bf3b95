//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by all domain actions.
//! All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use twilio::TwilioService;

use crate::domains::identity::JwtService;
use crate::kernel::{
    BaseEmailService, BaseEphemeralStore, BaseGoogleVerifier, BaseOtpGenerator, BaseSmsService,
};

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseSmsService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioAdapter {
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<()> {
        self.0
            .send_sms(phone_number, body)
            .await
            .map(|_| ())
            .map_err(Into::into)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Shared TTL store backing OTP staging sessions
    pub store: Arc<dyn BaseEphemeralStore>,
    pub sms: Arc<dyn BaseSmsService>,
    pub email: Arc<dyn BaseEmailService>,
    pub otp_generator: Arc<dyn BaseOtpGenerator>,
    pub google: Arc<dyn BaseGoogleVerifier>,
    /// JWT service for access/refresh token creation
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        store: Arc<dyn BaseEphemeralStore>,
        sms: Arc<dyn BaseSmsService>,
        email: Arc<dyn BaseEmailService>,
        otp_generator: Arc<dyn BaseOtpGenerator>,
        google: Arc<dyn BaseGoogleVerifier>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            db_pool,
            store,
            sms,
            email,
            otp_generator,
            google,
            jwt_service,
        }
    }
}
