//! Create company action - stage the company and text an OTP to its phone

use tracing::info;

use crate::common::utils::identifier_digest;
use crate::common::{require_role, AuthError, Role, ServiceError, ServiceResult};
use crate::domains::company::data::CreateCompanyInput;
use crate::domains::company::draft::CompanyDraft;
use crate::domains::company::models::Company;
use crate::domains::company::validation::{
    non_blank, parse_user_id, validate_company_name, validate_phone, validate_url,
};
use crate::domains::identity::models::User;
use crate::domains::identity::OtpDispatchResult;
use crate::domains::otp::{deliver_otp, StagingSessionManager};
use crate::kernel::ServerDeps;

/// Start onboarding a company for an agent.
///
/// The company row is written only after `verify_company_otp` confirms the
/// code sent to `phone`.
pub async fn create_company(
    input: CreateCompanyInput,
    deps: &ServerDeps,
) -> ServiceResult<OtpDispatchResult> {
    validate_company_name(&input.name).map_err(ServiceError::Validation)?;
    let website = non_blank(input.website);
    if let Some(website) = &website {
        validate_url(website, "website").map_err(ServiceError::Validation)?;
    }
    validate_phone(&input.phone).map_err(ServiceError::Validation)?;
    let user_id = parse_user_id(&input.user_id).map_err(ServiceError::Validation)?;
    let logo = non_blank(input.logo);
    if let Some(logo) = &logo {
        validate_url(logo, "logo").map_err(ServiceError::Validation)?;
    }

    let user = User::find_by_id(user_id, &deps.db_pool)
        .await?
        .ok_or_else(|| ServiceError::validation("Invalid user ID provided."))?;
    require_role(user.role(), &[Role::Agent])
        .map_err(|_| AuthError::Rejected("User is not an agent.".to_string()))?;

    let phone = input.phone.trim().to_string();
    if Company::exists_by_phone(&phone, &deps.db_pool).await? {
        return Err(AuthError::Conflict(
            "Company with this phone number already exists.".to_string(),
        )
        .into());
    }

    let draft = CompanyDraft {
        name: input.name.trim().to_string(),
        description: non_blank(input.description),
        website,
        logo,
        phone: phone.clone(),
        user_id,
    };

    let code = deps.otp_generator.generate();
    StagingSessionManager::<CompanyDraft>::new(deps.store.clone())
        .begin(&phone, &code, &draft)
        .await?;
    deliver_otp(&phone, &code, deps).await?;

    info!(
        identifier = %identifier_digest(&phone),
        user_id = %user_id,
        "Company onboarding staged"
    );
    Ok(OtpDispatchResult::sent_to(&phone))
}
