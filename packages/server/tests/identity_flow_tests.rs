//! Integration tests for signup, login, token refresh, and Google sign-in.

mod common;

use common::{create_test_user, unique_email, TestHarness, TEST_GOOGLE_TOKEN, TEST_OTP, TEST_PASSWORD};
use identity_core::common::Role;
use identity_core::domains::identity::models::{NewUser, User, PROVIDER_GOOGLE};
use identity_core::kernel::test_dependencies::MockEmailService;
use identity_core::server::middleware::AuthUser;
use std::sync::Arc;
use test_context::test_context;

// ============================================================================
// Test Helpers
// ============================================================================

fn signup_mutation(name: &str, email: &str, password: &str, role: Option<&str>) -> String {
    let role = role
        .map(|r| format!(r#", role: "{}""#, r))
        .unwrap_or_default();
    format!(
        r#"mutation {{ signup(input: {{ name: "{}", email: "{}", password: "{}"{} }}) {{ success message }} }}"#,
        name, email, password, role
    )
}

fn verify_otp_mutation(email: &str, otp: &str) -> String {
    format!(
        r#"mutation {{ verifyOtp(input: {{ email: "{}", otp: "{}" }}) {{ accessToken refreshToken user {{ id email name role provider isValidUser }} }} }}"#,
        email, otp
    )
}

fn login_mutation(email: &str, password: &str) -> String {
    format!(
        r#"mutation {{ login(input: {{ email: "{}", password: "{}" }}) {{ accessToken refreshToken user {{ id email }} }} }}"#,
        email, password
    )
}

fn refresh_mutation(token: &str) -> String {
    format!(
        r#"mutation {{ refreshToken(refreshToken: "{}") {{ accessToken refreshToken user {{ id }} }} }}"#,
        token
    )
}

// ============================================================================
// Signup
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_signup_stages_without_creating_user(ctx: &TestHarness) {
    let email = unique_email();
    let client = ctx.graphql();

    let data = client
        .query(&signup_mutation("Ana", &email, "hunter22", None))
        .await;
    assert_eq!(data["signup"]["success"], true);
    assert_eq!(data["signup"]["message"], format!("OTP sent to {}", email));

    // Code went out by email, no account yet
    let sent = ctx.email.last_to(&email).expect("OTP email sent");
    assert_eq!(sent.subject, "Your OTP Code");
    assert!(sent.text_body.contains(TEST_OTP));
    assert!(User::find_by_email(&email, &ctx.db_pool).await.unwrap().is_none());

    // The staged draft holds a hash, never the password
    let draft = ctx.store.peek(&format!("user_draft:{}", email)).unwrap();
    assert!(!draft.contains("hunter22"));
    assert!(draft.contains("$argon2"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_signup_then_verify_creates_user(ctx: &TestHarness) {
    let email = unique_email();
    let client = ctx.graphql();

    client
        .query(&signup_mutation("Ana", &email, "hunter22", Some("AGENT")))
        .await;
    let data = client.query(&verify_otp_mutation(&email, TEST_OTP)).await;

    let user = &data["verifyOtp"]["user"];
    assert_eq!(user["email"], email.as_str());
    assert_eq!(user["role"], "AGENT");
    assert_eq!(user["provider"], "local");
    assert_eq!(user["isValidUser"], true);
    assert!(data["verifyOtp"]["accessToken"].as_str().unwrap().len() > 20);

    // Session fully cleared
    assert!(!ctx.store.contains(&format!("otp:{}", email)));
    assert!(!ctx.store.contains(&format!("user_draft:{}", email)));

    // Tokens work: access token resolves to the new user
    let access = data["verifyOtp"]["accessToken"].as_str().unwrap();
    let claims = ctx.jwt_service.verify_access_token(access).unwrap();
    assert_eq!(claims.user_id.to_string(), user["id"].as_str().unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_signup_rejects_existing_email(ctx: &TestHarness) {
    let user = create_test_user(&ctx.db_pool, Role::User).await.unwrap();

    let result = ctx
        .graphql()
        .execute(&signup_mutation("Ana", &user.email, "hunter22", None))
        .await;
    assert_eq!(result.error(), "Email already exists");
    assert_eq!(result.code(), "CONFLICT");
    assert!(ctx.email.sent().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_signup_validation(ctx: &TestHarness) {
    let client = ctx.graphql();

    let result = client
        .execute(&signup_mutation("Ana", "not-an-email", "hunter22", None))
        .await;
    assert_eq!(result.error(), "Invalid email format");
    assert_eq!(result.code(), "BAD_USER_INPUT");

    let result = client
        .execute(&signup_mutation("Ana", &unique_email(), "123", None))
        .await;
    assert_eq!(result.code(), "BAD_USER_INPUT");

    let result = client
        .execute(&signup_mutation("Ana", &unique_email(), "hunter22", Some("ROOT")))
        .await;
    assert_eq!(result.code(), "BAD_USER_INPUT");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_signup_delivery_failure(ctx: &TestHarness) {
    let mut deps = ctx.server_deps();
    deps.email = Arc::new(MockEmailService::failing());
    let client = ctx.graphql_with_deps(deps);

    let result = client
        .execute(&signup_mutation("Ana", &unique_email(), "hunter22", None))
        .await;
    assert_eq!(result.error(), "OTP delivery failed");
    assert_eq!(result.code(), "DELIVERY_FAILED");
}

// ============================================================================
// OTP verification failures
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_wrong_codes_then_lockout(ctx: &TestHarness) {
    let email = unique_email();
    let client = ctx.graphql();
    client
        .query(&signup_mutation("Ana", &email, "hunter22", None))
        .await;

    for attempt in 1..=3 {
        let result = client.execute(&verify_otp_mutation(&email, "000000")).await;
        assert_eq!(
            result.error(),
            format!("Incorrect OTP. Attempt {} of 3", attempt)
        );
        assert_eq!(result.code(), "OTP_INVALID");
    }

    let result = client.execute(&verify_otp_mutation(&email, TEST_OTP)).await;
    assert_eq!(result.error(), "Too many incorrect attempts. Request a new OTP.");
    assert_eq!(result.code(), "OTP_LOCKED");
    assert!(User::find_by_email(&email, &ctx.db_pool).await.unwrap().is_none());

    // A fresh signup starts a new session
    client
        .query(&signup_mutation("Ana", &email, "hunter22", None))
        .await;
    client.query(&verify_otp_mutation(&email, TEST_OTP)).await;
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_verify_without_session(ctx: &TestHarness) {
    let result = ctx
        .graphql()
        .execute(&verify_otp_mutation(&unique_email(), TEST_OTP))
        .await;
    assert_eq!(
        result.error(),
        "Verification session is invalid or has expired"
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_expired_session(ctx: &TestHarness) {
    let email = unique_email();
    let client = ctx.graphql();
    client
        .query(&signup_mutation("Ana", &email, "hunter22", None))
        .await;

    ctx.store.force_expire(&format!("otp:{}", email));

    let result = client.execute(&verify_otp_mutation(&email, TEST_OTP)).await;
    assert_eq!(
        result.error(),
        "Verification session is invalid or has expired"
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_tampered_draft_is_reported_as_expired(ctx: &TestHarness) {
    let email = unique_email();
    let client = ctx.graphql();
    client
        .query(&signup_mutation("Ana", &email, "hunter22", None))
        .await;

    ctx.store.insert_raw(
        &format!("user_draft:{}", email),
        r#"{"name":"Ana","email":"x@example.com","password_hash":"plain","role":"ADMIN"}"#,
    );

    let result = client.execute(&verify_otp_mutation(&email, TEST_OTP)).await;
    assert_eq!(
        result.error(),
        "Verification session is invalid or has expired"
    );
    assert!(User::find_by_email("x@example.com", &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}

// ============================================================================
// Login, refresh, logout
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_login(ctx: &TestHarness) {
    let user = create_test_user(&ctx.db_pool, Role::User).await.unwrap();
    let client = ctx.graphql();

    let data = client.query(&login_mutation(&user.email, TEST_PASSWORD)).await;
    assert_eq!(data["login"]["user"]["id"], user.id.to_string());

    let result = client.execute(&login_mutation(&user.email, "wrong-pass")).await;
    assert_eq!(result.error(), "Invalid credentials");
    assert_eq!(result.code(), "UNAUTHENTICATED");

    let result = client
        .execute(&login_mutation(&unique_email(), TEST_PASSWORD))
        .await;
    assert_eq!(result.error(), "Invalid credentials");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_refresh_rotates_token(ctx: &TestHarness) {
    let user = create_test_user(&ctx.db_pool, Role::User).await.unwrap();
    let client = ctx.graphql();

    let data = client.query(&login_mutation(&user.email, TEST_PASSWORD)).await;
    let first = data["login"]["refreshToken"].as_str().unwrap().to_string();

    let data = client.query(&refresh_mutation(&first)).await;
    let second = data["refreshToken"]["refreshToken"].as_str().unwrap();
    assert_ne!(first, second);
    assert_eq!(data["refreshToken"]["user"]["id"], user.id.to_string());

    // The old token is spent
    let result = client.execute(&refresh_mutation(&first)).await;
    assert_eq!(result.error(), "Invalid or expired refresh token");

    // Access tokens are not refresh tokens
    let access = data["refreshToken"]["accessToken"].as_str().unwrap();
    let result = client.execute(&refresh_mutation(access)).await;
    assert_eq!(result.error(), "Invalid or expired refresh token");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_logout_is_idempotent(ctx: &TestHarness) {
    let user = create_test_user(&ctx.db_pool, Role::User).await.unwrap();
    let client = ctx.graphql();

    let data = client.query(&login_mutation(&user.email, TEST_PASSWORD)).await;
    let token = data["login"]["refreshToken"].as_str().unwrap().to_string();

    let logout = format!(r#"mutation {{ logout(refreshToken: "{}") }}"#, token);
    assert_eq!(client.query(&logout).await["logout"], true);
    assert_eq!(client.query(&logout).await["logout"], true);

    let result = client.execute(&refresh_mutation(&token)).await;
    assert_eq!(result.error(), "Invalid or expired refresh token");
}

// ============================================================================
// Google sign-in and `me`
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_google_login_creates_then_reuses_user(ctx: &TestHarness) {
    let client = ctx.graphql();
    let mutation = format!(
        r#"mutation {{ googleLogin(input: {{ token: "{}" }}) {{ user {{ id email provider role }} }} }}"#,
        TEST_GOOGLE_TOKEN
    );

    let first = client.query(&mutation).await;
    assert_eq!(first["googleLogin"]["user"]["provider"], "google");
    assert_eq!(first["googleLogin"]["user"]["role"], "USER");

    let second = client.query(&mutation).await;
    assert_eq!(
        first["googleLogin"]["user"]["id"],
        second["googleLogin"]["user"]["id"]
    );

    let result = client
        .execute(r#"mutation { googleLogin(input: { token: "forged" }) { accessToken } }"#)
        .await;
    assert_eq!(result.error(), "Invalid Google token");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_me(ctx: &TestHarness) {
    let user = create_test_user(&ctx.db_pool, Role::Agent).await.unwrap();

    let result = ctx.graphql().execute("{ me { id } }").await;
    assert_eq!(result.error(), "Authentication required");
    assert_eq!(result.code(), "UNAUTHENTICATED");

    let client = ctx.graphql_as(AuthUser {
        user_id: user.id,
        role: Role::Agent,
    });
    let data = client.query("{ me { id email role } }").await;
    assert_eq!(data["me"]["email"], user.email.as_str());
    assert_eq!(data["me"]["role"], "AGENT");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_email_taken_before_verify_discards_session(ctx: &TestHarness) {
    let email = unique_email();
    let client = ctx.graphql();
    client
        .query(&signup_mutation("Ana", &email, "hunter22", None))
        .await;

    // A Google sign-in claims the address while the code is outstanding
    User::create(
        NewUser {
            email: email.clone(),
            name: "Ana Google".to_string(),
            password_hash: None,
            provider: PROVIDER_GOOGLE,
            role: Role::User,
        },
        &ctx.db_pool,
    )
    .await
    .unwrap();

    let result = client.execute(&verify_otp_mutation(&email, TEST_OTP)).await;
    assert_eq!(result.error(), "Email already exists");
    assert_eq!(result.code(), "CONFLICT");
    assert!(!ctx.store.contains(&format!("user_draft:{}", email)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_failed_user_insert_keeps_draft(ctx: &TestHarness) {
    let email = unique_email();
    let client = ctx.graphql();
    client
        .query(&signup_mutation("Ana", &email, "hunter22", None))
        .await;

    // Postgres rejects NUL in text, so the insert fails after the code checks out
    let draft_key = format!("user_draft:{}", email);
    let mut draft: serde_json::Value =
        serde_json::from_str(&ctx.store.peek(&draft_key).unwrap()).unwrap();
    draft["name"] = serde_json::Value::String("Ana\u{0}".to_string());
    ctx.store.insert_raw(&draft_key, &draft.to_string());

    let result = client.execute(&verify_otp_mutation(&email, TEST_OTP)).await;
    assert_eq!(result.code(), "INTERNAL");
    assert!(ctx.store.contains(&draft_key));
    assert!(User::find_by_email(&email, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}
