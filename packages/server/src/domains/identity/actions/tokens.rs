use tracing::debug;

use crate::common::ServiceResult;
use crate::domains::identity::data::{AuthPayload, UserData};
use crate::domains::identity::models::{Session, User};
use crate::kernel::ServerDeps;

/// Issue an access/refresh pair for `user` and persist the refresh session
pub async fn issue_tokens(user: User, deps: &ServerDeps) -> ServiceResult<AuthPayload> {
    let pair = deps.jwt_service.issue_pair(user.id, user.role())?;
    Session::create(
        user.id,
        &pair.refresh_token,
        pair.refresh_expires_at,
        &deps.db_pool,
    )
    .await?;

    debug!(user_id = %user.id, "Issued token pair");
    Ok(AuthPayload {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: UserData::from(user),
    })
}
