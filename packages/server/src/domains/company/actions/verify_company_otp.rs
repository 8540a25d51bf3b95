use tracing::{info, warn};

use crate::common::utils::identifier_digest;
use crate::common::{AuthError, ServiceError, ServiceResult};
use crate::domains::company::data::{CompanyData, CompanyPayload, VerifyCompanyOtpInput};
use crate::domains::company::draft::CompanyDraft;
use crate::domains::company::models::Company;
use crate::domains::company::validation::validate_phone;
use crate::domains::identity::validation::validate_otp;
use crate::domains::otp::StagingSessionManager;
use crate::kernel::ServerDeps;

/// Confirm the texted code and create the verified company
pub async fn verify_company_otp(
    input: VerifyCompanyOtpInput,
    deps: &ServerDeps,
) -> ServiceResult<CompanyPayload> {
    validate_phone(&input.phone).map_err(ServiceError::Validation)?;
    validate_otp(&input.otp).map_err(ServiceError::Validation)?;

    let phone = input.phone.trim().to_string();
    let sessions = StagingSessionManager::<CompanyDraft>::new(deps.store.clone());

    sessions.verify(&phone, &input.otp).await?;
    let draft = sessions.retrieve_draft(&phone).await?;

    if Company::exists_by_phone(&draft.phone, &deps.db_pool).await? {
        sessions.discard(&phone).await?;
        return Err(AuthError::Conflict(
            "Company with this phone number already exists.".to_string(),
        )
        .into());
    }

    let company = Company::create_verified(draft, &deps.db_pool).await?;

    if let Err(e) = sessions.discard(&phone).await {
        warn!(error = %e, identifier = %identifier_digest(&phone), "Failed to discard session");
    }

    info!(company_id = %company.id, created_by = %company.created_by, "Company verified");
    Ok(CompanyPayload {
        company: CompanyData::from(company),
    })
}
