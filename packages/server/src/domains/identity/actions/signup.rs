//! Signup action - stage the account and email an OTP

use tracing::info;

use crate::common::utils::identifier_digest;
use crate::common::{AuthError, ServiceError, ServiceResult};
use crate::domains::identity::data::{OtpDispatchResult, SignupInput};
use crate::domains::identity::draft::UserDraft;
use crate::domains::identity::models::User;
use crate::domains::identity::password::hash_password;
use crate::domains::identity::validation::{
    normalize_email, validate_email, validate_name, validate_password, validate_role,
};
use crate::domains::otp::{deliver_otp, StagingSessionManager};
use crate::kernel::ServerDeps;

/// Start a signup.
///
/// Nothing durable is written here. The account only exists once
/// `verify_signup_otp` confirms the emailed code.
pub async fn signup(input: SignupInput, deps: &ServerDeps) -> ServiceResult<OtpDispatchResult> {
    validate_name(&input.name).map_err(ServiceError::Validation)?;
    validate_email(&input.email).map_err(ServiceError::Validation)?;
    validate_password(&input.password).map_err(ServiceError::Validation)?;
    let role = validate_role(input.role.as_deref()).map_err(ServiceError::Validation)?;

    let email = normalize_email(&input.email);
    if User::exists_by_email(&email, &deps.db_pool).await? {
        return Err(AuthError::Conflict("Email already exists".to_string()).into());
    }

    let draft = UserDraft {
        name: input.name.trim().to_string(),
        email: email.clone(),
        password_hash: hash_password(&input.password)?,
        role,
    };

    let code = deps.otp_generator.generate();
    StagingSessionManager::<UserDraft>::new(deps.store.clone())
        .begin(&email, &code, &draft)
        .await?;
    deliver_otp(&email, &code, deps).await?;

    info!(identifier = %identifier_digest(&email), role = %role, "Signup staged");
    Ok(OtpDispatchResult::sent_to(&email))
}
