use anyhow::Context;
use tracing::debug;

use crate::common::ServiceResult;
use crate::domains::identity::models::Session;
use crate::kernel::ServerDeps;

/// Revoke a refresh session. Unknown or already-revoked tokens succeed.
pub async fn logout(refresh_token: String, deps: &ServerDeps) -> ServiceResult<bool> {
    let removed = Session::delete_by_token(&refresh_token, &deps.db_pool)
        .await
        .context("Failed to logout")?;
    debug!(removed, "Logout");
    Ok(true)
}
