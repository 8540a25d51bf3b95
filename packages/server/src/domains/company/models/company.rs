use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::company::draft::CompanyDraft;

/// Company - a verified business profile owned by an agent
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub phone: String,
    pub verified: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Company {
    pub async fn exists_by_phone(phone: &str, pool: &PgPool) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM companies WHERE phone = $1)",
        )
        .bind(phone)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Insert a company from a confirmed draft
    pub async fn create_verified(draft: CompanyDraft, pool: &PgPool) -> Result<Self> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, description, website, logo, phone, verified, created_by)
            VALUES ($1, $2, $3, $4, $5, true, $6)
            RETURNING *
            "#,
        )
        .bind(draft.name)
        .bind(draft.description)
        .bind(draft.website)
        .bind(draft.logo)
        .bind(draft.phone)
        .bind(draft.user_id)
        .fetch_one(pool)
        .await?;
        Ok(company)
    }
}
