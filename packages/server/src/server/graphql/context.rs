use std::sync::Arc;

use juniper::FieldError;

use crate::common::{AuthError, ServiceError};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared dependencies plus the caller resolved by the JWT middleware.
#[derive(Clone)]
pub struct GraphQLContext {
    pub deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self { deps, auth_user }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    /// The authenticated caller, or an `UNAUTHENTICATED` error
    pub fn require_auth(&self) -> Result<&AuthUser, FieldError> {
        self.auth_user
            .as_ref()
            .ok_or_else(|| ServiceError::from(AuthError::AuthenticationRequired).into_field_error())
    }
}
