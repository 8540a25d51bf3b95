use tracing::{debug, info};

use crate::common::{AuthError, Role, ServiceError, ServiceResult};
use crate::domains::identity::actions::issue_tokens;
use crate::domains::identity::data::{AuthPayload, GoogleLoginInput};
use crate::domains::identity::models::{NewUser, User, PROVIDER_GOOGLE};
use crate::domains::identity::validation::normalize_email;
use crate::kernel::ServerDeps;

/// Sign in with a Google ID token, creating the account on first use
pub async fn google_login(input: GoogleLoginInput, deps: &ServerDeps) -> ServiceResult<AuthPayload> {
    if input.token.trim().is_empty() {
        return Err(ServiceError::validation("Token is required"));
    }

    let profile = deps
        .google
        .verify_id_token(input.token.trim())
        .await
        .map_err(|e| {
            debug!(error = %e, "Google token rejected");
            AuthError::InvalidGoogleToken
        })?;

    let email = normalize_email(&profile.email);
    let user = match User::find_by_email(&email, &deps.db_pool).await? {
        Some(user) => user,
        None => {
            let user = User::create(
                NewUser {
                    email,
                    name: profile.name,
                    password_hash: None,
                    provider: PROVIDER_GOOGLE,
                    role: Role::User,
                },
                &deps.db_pool,
            )
            .await?;
            info!(user_id = %user.id, "User created from Google login");
            user
        }
    };

    issue_tokens(user, deps).await
}
