//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use identity_core::common::Role;
use identity_core::domains::identity::models::{NewUser, User, PROVIDER_LOCAL};
use identity_core::domains::identity::password::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse";

/// Email no other test uses
pub fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

/// E.164 phone number no other test uses
pub fn unique_phone() -> String {
    format!("+15{:09}", Uuid::new_v4().as_u128() % 1_000_000_000)
}

/// Create a password user directly, skipping the OTP flow
pub async fn create_test_user(pool: &PgPool, role: Role) -> Result<User> {
    User::create(
        NewUser {
            email: unique_email(),
            name: "Test User".to_string(),
            password_hash: Some(hash_password(TEST_PASSWORD)?),
            provider: PROVIDER_LOCAL,
            role,
        },
        pool,
    )
    .await
}
