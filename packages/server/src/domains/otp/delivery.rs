//! Outbound OTP messages.

use anyhow::Context;
use tracing::info;

use crate::common::utils::identifier_digest;
use crate::common::{ServiceError, ServiceResult};
use crate::kernel::{EmailMessage, ServerDeps};

/// Minutes a code stays valid, as told to the recipient
const VALIDITY_MINUTES: u64 = super::SESSION_TTL_SECONDS / 60;

const EMAIL_SUBJECT: &str = "Your OTP Code";

/// Channel a destination is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Email,
    Sms,
}

impl DeliveryChannel {
    pub fn for_destination(destination: &str) -> Self {
        if destination.contains('@') {
            DeliveryChannel::Email
        } else {
            DeliveryChannel::Sms
        }
    }
}

pub fn sms_body(code: &str) -> String {
    format!(
        "Your verification code is {}. It is valid for {} minutes.",
        code, VALIDITY_MINUTES
    )
}

pub fn email_message(to: &str, code: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: EMAIL_SUBJECT.to_string(),
        text_body: format!(
            "Your OTP code is {}. It is valid for {} minutes.",
            code, VALIDITY_MINUTES
        ),
        html_body: format!(
            "<p>Your OTP code is <strong>{}</strong>.</p><p>It is valid for {} minutes.</p>",
            code, VALIDITY_MINUTES
        ),
    }
}

/// Send `code` to an email address or phone number.
///
/// Provider failures become `DeliveryFailed`; the staged session is left in
/// place so the client can request a fresh code.
pub async fn deliver_otp(destination: &str, code: &str, deps: &ServerDeps) -> ServiceResult<()> {
    let channel = DeliveryChannel::for_destination(destination);
    let result = match channel {
        DeliveryChannel::Email => deps
            .email
            .send_email(email_message(destination, code))
            .await
            .context("email provider"),
        DeliveryChannel::Sms => deps
            .sms
            .send_sms(destination, &sms_body(code))
            .await
            .context("sms provider"),
    };
    result.map_err(ServiceError::DeliveryFailed)?;

    info!(
        channel = ?channel,
        identifier = %identifier_digest(destination),
        "OTP dispatched"
    );
    Ok(())
}
