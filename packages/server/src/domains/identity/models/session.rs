use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::utils::sha256_hex;

/// Refresh session - one row per outstanding refresh token.
///
/// Only the SHA-256 of the token is stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn hash_token(token: &str) -> String {
        sha256_hex(token)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Session {
    pub async fn create(
        user_id: Uuid,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(Self::hash_token(refresh_token))
        .bind(expires_at)
        .fetch_one(pool)
        .await?;
        Ok(session)
    }

    /// Unexpired session for a refresh token
    pub async fn find_valid(refresh_token: &str, pool: &PgPool) -> Result<Option<Self>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE token_hash = $1 AND expires_at > NOW()",
        )
        .bind(Self::hash_token(refresh_token))
        .fetch_optional(pool)
        .await?;
        Ok(session)
    }

    /// Returns the number of rows removed
    pub async fn delete_by_token(refresh_token: &str, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(Self::hash_token(refresh_token))
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_hex_sha256() {
        let hash = Session::hash_token("token");
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, "token");
        assert_eq!(hash, Session::hash_token("token"));
    }
}
