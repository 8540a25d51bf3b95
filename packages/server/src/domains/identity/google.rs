//! Google ID token verification via the tokeninfo endpoint.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::kernel::{BaseGoogleVerifier, GoogleProfile};

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: Option<String>,
    name: Option<String>,
}

pub struct GoogleTokenInfoVerifier {
    client: reqwest::Client,
    client_id: String,
    endpoint: String,
}

impl GoogleTokenInfoVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            endpoint: TOKENINFO_URL.to_string(),
        }
    }
}

fn profile_for_audience(info: TokenInfo, client_id: &str) -> Result<GoogleProfile> {
    if info.aud != client_id {
        return Err(anyhow!("Token audience does not match client id"));
    }
    match (info.email, info.name) {
        (Some(email), Some(name)) if !email.is_empty() => Ok(GoogleProfile { email, name }),
        _ => Err(anyhow!("Token is missing email or name")),
    }
}

#[async_trait]
impl BaseGoogleVerifier for GoogleTokenInfoVerifier {
    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleProfile> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .context("tokeninfo request failed")?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "tokeninfo rejected token");
            return Err(anyhow!("Google rejected the ID token"));
        }

        let info: TokenInfo = response
            .json()
            .await
            .context("tokeninfo returned an unexpected body")?;
        profile_for_audience(info, &self.client_id)
    }
}
