//! Test harness with testcontainers for integration testing.
//!
//! Uses shared containers across all tests for dramatically improved performance.
//! Containers and migrations are initialized once on first test, then reused.

use anyhow::{Context, Result};
use identity_core::domains::identity::JwtService;
use identity_core::kernel::test_dependencies::{
    FixedOtpGenerator, MockEmailService, MockEphemeralStore, MockGoogleVerifier, MockSmsService,
};
use identity_core::kernel::{RedisStore, ServerDeps};
use identity_core::server::middleware::AuthUser;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;

use super::GraphQLClient;

/// Code handed out by the harness OTP generator
pub const TEST_OTP: &str = "482193";

/// Google ID token the harness verifier accepts
pub const TEST_GOOGLE_TOKEN: &str = "google-id-token-ana";

/// Shared test infrastructure that persists across all tests.
/// Containers are started once and reused, migrations run once.
struct SharedTestInfra {
    db_url: String,
    redis_url: String,
    // Keep containers alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
    _redis: ContainerAsync<Redis>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    /// Initialize shared infrastructure (containers + migrations).
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let redis = Redis::default()
            .start()
            .await
            .context("Failed to start Redis container")?;

        let redis_host = redis.get_host().await?;
        let redis_port = redis.get_host_port_ipv4(6379).await?;
        let redis_url = format!("redis://{}:{}", redis_host, redis_port);

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            redis_url,
            _postgres: postgres,
            _redis: redis,
        })
    }

    /// Get or initialize the shared infrastructure.
    pub(super) async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// Each test gets a fresh pool and fresh mocks; containers are shared. Tests
/// use unique emails and phone numbers (see fixtures) so they can run in
/// parallel against the same database.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let client = ctx.graphql();
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
    pub redis_url: String,
    /// In-memory OTP session store shared with the default deps
    pub store: MockEphemeralStore,
    pub sms: MockSmsService,
    pub email: MockEmailService,
    pub jwt_service: Arc<JwtService>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            redis_url: infra.redis_url.clone(),
            store: MockEphemeralStore::new(),
            sms: MockSmsService::new(),
            email: MockEmailService::new(),
            jwt_service: Arc::new(JwtService::new(
                "test_access_secret",
                "test_refresh_secret",
                "test_issuer".to_string(),
            )),
        })
    }

    /// Dependencies wired to this harness's mocks. Fields are public, so a
    /// test can swap one collaborator before building a client.
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.db_pool.clone(),
            Arc::new(self.store.clone()),
            Arc::new(self.sms.clone()),
            Arc::new(self.email.clone()),
            Arc::new(FixedOtpGenerator::new(TEST_OTP)),
            Arc::new(MockGoogleVerifier::new().with_token(
                TEST_GOOGLE_TOKEN,
                "ana.google@example.com",
                "Ana Google",
            )),
            self.jwt_service.clone(),
        )
    }

    /// Connect a store to the shared Redis container
    pub async fn redis_store(&self) -> RedisStore {
        RedisStore::connect(&self.redis_url)
            .await
            .expect("Failed to connect to test Redis")
    }

    /// Unauthenticated GraphQL client
    pub fn graphql(&self) -> GraphQLClient {
        GraphQLClient::new(Arc::new(self.server_deps()), None)
    }

    pub fn graphql_as(&self, auth_user: AuthUser) -> GraphQLClient {
        GraphQLClient::new(Arc::new(self.server_deps()), Some(auth_user))
    }

    pub fn graphql_with_deps(&self, deps: ServerDeps) -> GraphQLClient {
        GraphQLClient::new(Arc::new(deps), None)
    }
}
