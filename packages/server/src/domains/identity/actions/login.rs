use tracing::info;

use crate::common::{AuthError, ServiceError, ServiceResult};
use crate::domains::identity::actions::issue_tokens;
use crate::domains::identity::data::{AuthPayload, LoginInput};
use crate::domains::identity::models::User;
use crate::domains::identity::password::verify_password;
use crate::domains::identity::validation::{normalize_email, validate_email};
use crate::kernel::ServerDeps;

/// Password login. Unknown email, Google-only account, and wrong password all
/// produce the same error.
pub async fn login(input: LoginInput, deps: &ServerDeps) -> ServiceResult<AuthPayload> {
    validate_email(&input.email).map_err(ServiceError::Validation)?;
    if input.password.is_empty() {
        return Err(ServiceError::validation("Password is required"));
    }

    let email = normalize_email(&input.email);
    let user = User::find_by_email(&email, &deps.db_pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let matches = user
        .password_hash
        .as_deref()
        .map(|hash| verify_password(&input.password, hash))
        .unwrap_or(false);
    if !matches {
        return Err(AuthError::InvalidCredentials.into());
    }

    info!(user_id = %user.id, "Password login");
    issue_tokens(user, deps).await
}
