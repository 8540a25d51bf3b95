use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_company_name, validate_phone, validate_url};
use crate::domains::otp::StagedDraft;

/// A company awaiting phone confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyDraft {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub phone: String,
    /// Agent who started onboarding; becomes `created_by`
    pub user_id: Uuid,
}

impl StagedDraft for CompanyDraft {
    const NAMESPACE: &'static str = "company_draft";

    fn validate(&self) -> Result<(), String> {
        validate_company_name(&self.name)?;
        validate_phone(&self.phone)?;
        if let Some(website) = &self.website {
            validate_url(website, "website")?;
        }
        if let Some(logo) = &self.logo {
            validate_url(logo, "logo")?;
        }
        Ok(())
    }

    fn identifier(&self) -> &str {
        &self.phone
    }
}
