use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::common::utils::identifier_digest;
use crate::kernel::{BaseEmailService, EmailMessage};

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid v3 mail client
/// Delivers transactional email (OTP codes)
pub struct SendGridClient {
    client: Client,
    api_key: String,
    from_email: String,
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl SendGridClient {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from_email,
        }
    }

    fn build_request<'a>(&'a self, message: &'a EmailMessage) -> MailRequest<'a> {
        MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: &message.to }],
            }],
            from: Address {
                email: &self.from_email,
            },
            subject: &message.subject,
            // SendGrid requires text/plain before text/html
            content: vec![
                Content {
                    content_type: "text/plain",
                    value: &message.text_body,
                },
                Content {
                    content_type: "text/html",
                    value: &message.html_body,
                },
            ],
        }
    }
}

#[async_trait]
impl BaseEmailService for SendGridClient {
    async fn send_email(&self, message: EmailMessage) -> Result<()> {
        let body = self.build_request(&message);

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!("SendGrid send failed {}: {}", status, body);
            anyhow::bail!("SendGrid API error {}: {}", status, body);
        }

        info!(
            recipient = %identifier_digest(&message.to),
            "Email accepted by SendGrid"
        );
        Ok(())
    }
}
