use serde::{Deserialize, Serialize};

use super::validation::{validate_email, validate_name};
use crate::common::Role;
use crate::domains::otp::StagedDraft;

/// A signup awaiting email confirmation. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl StagedDraft for UserDraft {
    const NAMESPACE: &'static str = "user_draft";

    fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        if !self.password_hash.starts_with("$argon2") {
            return Err("password_hash is not an argon2 hash".to_string());
        }
        Ok(())
    }

    fn identifier(&self) -> &str {
        &self.email
    }
}
