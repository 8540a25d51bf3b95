use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Role;

/// Access tokens are short-lived; clients refresh them with the refresh token
pub const ACCESS_TOKEN_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_DAYS: i64 = 7;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,    // Subject (user_id as string)
    pub user_id: Uuid,  // User UUID
    pub role: Role,     // Role at issue time
    pub exp: i64,       // Expiration timestamp
    pub iat: i64,       // Issued at timestamp
    pub iss: String,    // Issuer
    pub jti: String,    // JWT ID (unique token identifier)
}

/// Access + refresh token issued together
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT Service - creates and verifies access and refresh tokens.
///
/// The two token kinds are signed with different secrets so a refresh token
/// can never be presented as an access token.
pub struct JwtService {
    access: KeyPair,
    refresh: KeyPair,
    issuer: String,
}

impl JwtService {
    pub fn new(access_secret: &str, refresh_secret: &str, issuer: String) -> Self {
        Self {
            access: KeyPair::from_secret(access_secret),
            refresh: KeyPair::from_secret(refresh_secret),
            issuer,
        }
    }

    fn claims(&self, user_id: Uuid, role: Role, now: DateTime<Utc>, exp: DateTime<Utc>) -> Claims {
        Claims {
            sub: user_id.to_string(),
            user_id,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn create_access_token(&self, user_id: Uuid, role: Role) -> Result<String> {
        let now = Utc::now();
        let claims = self.claims(user_id, role, now, now + Duration::minutes(ACCESS_TOKEN_MINUTES));
        encode(&Header::default(), &claims, &self.access.encoding).map_err(Into::into)
    }

    /// Returns the token and its expiry, which the caller persists as a session
    pub fn create_refresh_token(&self, user_id: Uuid, role: Role) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let exp = now + Duration::days(REFRESH_TOKEN_DAYS);
        let claims = self.claims(user_id, role, now, exp);
        let token = encode(&Header::default(), &claims, &self.refresh.encoding)?;
        Ok((token, exp))
    }

    pub fn issue_pair(&self, user_id: Uuid, role: Role) -> Result<TokenPair> {
        let access_token = self.create_access_token(user_id, role)?;
        let (refresh_token, refresh_expires_at) = self.create_refresh_token(user_id, role)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.access.decoding)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.refresh.decoding)
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}
