use serde::Deserialize;

/// Message resource returned by `POST /Accounts/{sid}/Messages.json`
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

impl MessageResponse {
    /// Twilio accepts the message before delivery; only these statuses are terminal failures.
    pub fn is_failed(&self) -> bool {
        matches!(self.status.as_str(), "failed" | "undelivered" | "canceled")
    }
}

/// Error body returned by the Twilio REST API on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: Option<i64>,
    pub message: String,
    pub status: Option<u16>,
}
