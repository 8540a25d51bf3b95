// Minimal Twilio Programmable Messaging client.
//
// Only SMS sending is implemented. The OTP itself is generated by the caller
// so the same value can be staged and dispatched.

use std::collections::HashMap;

pub mod models;
use reqwest::Client;

use crate::models::{ApiErrorResponse, MessageResponse};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 format (or a Messaging Service SID starting with `MG`)
    pub from_number: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("Request to Twilio failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Twilio returned an error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Message {sid} was rejected with status {status}")]
    Rejected { sid: String, status: String },
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
    base_url: String,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
            base_url: TWILIO_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (test servers, regional edges)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{base}/Accounts/{sid}/Messages.json",
            base = self.base_url.trim_end_matches('/'),
            sid = self.options.account_sid
        )
    }

    /// Send a plain-text SMS to `recipient`.
    pub async fn send_sms(&self, recipient: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("Body", body);
        if self.options.from_number.starts_with("MG") {
            form_body.insert("MessagingServiceSid", &self.options.from_number);
        } else {
            form_body.insert("From", &self.options.from_number);
        }

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .map(|e| e.message)
                .unwrap_or(error_body);
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let message = response.json::<MessageResponse>().await?;
        if message.is_failed() {
            return Err(TwilioError::Rejected {
                sid: message.sid,
                status: message.status,
            });
        }

        Ok(message)
    }
}
