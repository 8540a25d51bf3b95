//! Verify signup OTP action - promote the staged draft to a user

use tracing::{info, warn};

use crate::common::utils::identifier_digest;
use crate::common::{AuthError, ServiceError, ServiceResult};
use crate::domains::identity::actions::issue_tokens;
use crate::domains::identity::data::{AuthPayload, OtpInput};
use crate::domains::identity::draft::UserDraft;
use crate::domains::identity::models::{NewUser, User, PROVIDER_LOCAL};
use crate::domains::identity::validation::{normalize_email, validate_email, validate_otp};
use crate::domains::otp::StagingSessionManager;
use crate::kernel::ServerDeps;

/// Confirm the emailed code, create the user, and sign them in.
///
/// The staged session is discarded only after the user row exists, so a
/// database failure leaves the draft in place for a retry.
pub async fn verify_signup_otp(input: OtpInput, deps: &ServerDeps) -> ServiceResult<AuthPayload> {
    validate_email(&input.email).map_err(ServiceError::Validation)?;
    validate_otp(&input.otp).map_err(ServiceError::Validation)?;

    let email = normalize_email(&input.email);
    let sessions = StagingSessionManager::<UserDraft>::new(deps.store.clone());

    sessions.verify(&email, &input.otp).await?;
    let draft = sessions.retrieve_draft(&email).await?;

    // Another signup for the same address may have completed meanwhile
    if User::exists_by_email(&draft.email, &deps.db_pool).await? {
        sessions.discard(&email).await?;
        return Err(AuthError::Conflict("Email already exists".to_string()).into());
    }

    let user = User::create(
        NewUser {
            email: draft.email,
            name: draft.name,
            password_hash: Some(draft.password_hash),
            provider: PROVIDER_LOCAL,
            role: draft.role,
        },
        &deps.db_pool,
    )
    .await?;

    if let Err(e) = sessions.discard(&email).await {
        // The user exists; leftover entries expire with their TTL
        warn!(error = %e, identifier = %identifier_digest(&email), "Failed to discard session");
    }

    info!(user_id = %user.id, "User created from verified signup");
    issue_tokens(user, deps).await
}
