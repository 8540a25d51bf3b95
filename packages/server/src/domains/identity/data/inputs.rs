use juniper::GraphQLInputObject;

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `USER` (default), `AGENT`, or `ADMIN`
    pub role: Option<String>,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct OtpInput {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct GoogleLoginInput {
    /// Google ID token from the client sign-in flow
    pub token: String,
}
