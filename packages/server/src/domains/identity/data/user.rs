use chrono::{DateTime, Utc};
use juniper::GraphQLObject;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Role;
use crate::domains::identity::models::User;

/// User GraphQL data type
///
/// Public API representation of an account. The password hash never leaves
/// the model.
#[derive(Debug, Clone, Serialize, Deserialize, GraphQLObject)]
#[graphql(description = "A registered account")]
pub struct UserData {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// `local` for password accounts, `google` for Google sign-in
    pub provider: String,
    pub is_valid_user: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role(),
            name: user.name,
            email: user.email,
            provider: user.provider,
            is_valid_user: user.is_valid_user,
            created_at: user.created_at,
        }
    }
}

/// Tokens plus the authenticated user
#[derive(Debug, Clone, GraphQLObject)]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserData,
}

/// Outcome of a mutation that staged a draft and sent an OTP
#[derive(Debug, Clone, GraphQLObject)]
pub struct OtpDispatchResult {
    pub success: bool,
    pub message: String,
}

impl OtpDispatchResult {
    pub fn sent_to(destination: &str) -> Self {
        Self {
            success: true,
            message: format!("OTP sent to {}", destination),
        }
    }
}
