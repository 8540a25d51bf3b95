use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::company::models::Company;

/// Company GraphQL data type
#[derive(Debug, Clone, Serialize, Deserialize, GraphQLObject)]
#[graphql(description = "A business profile onboarded by an agent")]
pub struct CompanyData {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    /// URL of an already-uploaded logo
    pub logo: Option<String>,
    pub phone: String,
    pub verified: bool,
    /// Agent who onboarded the company
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Company> for CompanyData {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            description: company.description,
            website: company.website,
            logo: company.logo,
            phone: company.phone,
            verified: company.verified,
            created_by: company.created_by,
            created_at: company.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct CompanyPayload {
    pub company: CompanyData,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateCompanyInput {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: String,
    /// Agent starting the onboarding
    pub user_id: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct VerifyCompanyOtpInput {
    pub phone: String,
    pub otp: String,
}
