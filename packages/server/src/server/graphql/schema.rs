//! GraphQL schema definition.

use juniper::{EmptySubscription, FieldResult, RootNode};

use super::context::GraphQLContext;
use crate::common::{AuthError, ServiceError};
use crate::domains::company::actions as company_actions;
use crate::domains::company::data::{CompanyPayload, CreateCompanyInput, VerifyCompanyOtpInput};
use crate::domains::identity::actions as identity_actions;
use crate::domains::identity::data::{
    AuthPayload, GoogleLoginInput, LoginInput, OtpDispatchResult, OtpInput, SignupInput, UserData,
};
use crate::domains::identity::models::User;

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// The user behind the access token
    async fn me(ctx: &GraphQLContext) -> FieldResult<UserData> {
        let auth_user = ctx.require_auth()?;
        let user = User::find_by_id(auth_user.user_id, &ctx.deps().db_pool)
            .await
            .map_err(|e| ServiceError::from(e).into_field_error())?
            .ok_or_else(|| ServiceError::from(AuthError::UserNoLongerExists).into_field_error())?;
        Ok(UserData::from(user))
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Identity
    // =========================================================================

    /// Stage a new account and email a one-time code
    async fn signup(ctx: &GraphQLContext, input: SignupInput) -> FieldResult<OtpDispatchResult> {
        identity_actions::signup(input, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }

    /// Confirm the signup code; creates the account and signs in
    async fn verify_otp(ctx: &GraphQLContext, input: OtpInput) -> FieldResult<AuthPayload> {
        identity_actions::verify_signup_otp(input, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }

    async fn login(ctx: &GraphQLContext, input: LoginInput) -> FieldResult<AuthPayload> {
        identity_actions::login(input, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }

    /// Rotate a refresh token into a fresh token pair
    async fn refresh_token(ctx: &GraphQLContext, refresh_token: String) -> FieldResult<AuthPayload> {
        identity_actions::refresh_token(refresh_token, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }

    async fn google_login(ctx: &GraphQLContext, input: GoogleLoginInput) -> FieldResult<AuthPayload> {
        identity_actions::google_login(input, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }

    /// Revoke a refresh token. Always true unless the database fails.
    async fn logout(ctx: &GraphQLContext, refresh_token: String) -> FieldResult<bool> {
        identity_actions::logout(refresh_token, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }

    // =========================================================================
    // Company onboarding
    // =========================================================================

    /// Stage a company for an agent and text a one-time code to its phone
    async fn create_company(
        ctx: &GraphQLContext,
        input: CreateCompanyInput,
    ) -> FieldResult<OtpDispatchResult> {
        company_actions::create_company(input, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }

    async fn verify_company_otp(
        ctx: &GraphQLContext,
        input: VerifyCompanyOtpInput,
    ) -> FieldResult<CompanyPayload> {
        company_actions::verify_company_otp(input, ctx.deps())
            .await
            .map_err(ServiceError::into_field_error)
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
