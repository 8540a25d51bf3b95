use tracing::{debug, info};

use crate::common::{AuthError, ServiceResult};
use crate::domains::identity::actions::issue_tokens;
use crate::domains::identity::data::AuthPayload;
use crate::domains::identity::models::{Session, User};
use crate::kernel::ServerDeps;

/// Exchange a refresh token for a new pair, rotating the session
pub async fn refresh_token(token: String, deps: &ServerDeps) -> ServiceResult<AuthPayload> {
    let claims = deps.jwt_service.verify_refresh_token(&token).map_err(|e| {
        debug!(error = %e, "Refresh token rejected");
        AuthError::InvalidRefreshToken
    })?;

    let session = Session::find_valid(&token, &deps.db_pool)
        .await?
        .ok_or(AuthError::InvalidRefreshToken)?;
    if session.user_id != claims.user_id {
        return Err(AuthError::InvalidRefreshToken.into());
    }

    let user = User::find_by_id(claims.user_id, &deps.db_pool)
        .await?
        .ok_or(AuthError::UserNoLongerExists)?;

    // Single use: a replayed token finds no session
    if Session::delete_by_token(&token, &deps.db_pool).await? == 0 {
        return Err(AuthError::InvalidRefreshToken.into());
    }

    info!(user_id = %user.id, "Refresh session rotated");
    issue_tokens(user, deps).await
}
