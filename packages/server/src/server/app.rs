//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use twilio::{TwilioOptions, TwilioService};

use crate::common::utils::SendGridClient;
use crate::config::Config;
use crate::domains::identity::{GoogleTokenInfoVerifier, JwtService};
use crate::domains::otp::RandomOtpGenerator;
use crate::kernel::{BaseEphemeralStore, ServerDeps, TwilioAdapter};
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::middleware::{jwt_auth_middleware, AuthUser};
use crate::server::routes::{
    graphql_batch_handler, graphql_handler, graphql_playground, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
}

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    Extension(state): Extension<AxumAppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Populated by jwt_auth_middleware
    let auth_user = request.extensions().get::<AuthUser>().cloned();

    let context = GraphQLContext::new(state.deps.clone(), auth_user);
    request.extensions_mut().insert(context);

    next.run(request).await
}

/// Wire production collaborators from configuration
pub fn build_deps(config: &Config, pool: PgPool, store: Arc<dyn BaseEphemeralStore>) -> ServerDeps {
    let twilio = Arc::new(TwilioService::new(TwilioOptions {
        account_sid: config.twilio_account_sid.clone(),
        auth_token: config.twilio_auth_token.clone(),
        from_number: config.twilio_from_number.clone(),
    }));

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        &config.jwt_refresh_secret,
        config.jwt_issuer.clone(),
    ));

    ServerDeps::new(
        pool,
        store,
        Arc::new(TwilioAdapter::new(twilio)),
        Arc::new(SendGridClient::new(
            config.sendgrid_api_key.clone(),
            config.email_from.clone(),
        )),
        Arc::new(RandomOtpGenerator),
        Arc::new(GoogleTokenInfoVerifier::new(config.google_client_id.clone())),
        jwt_service,
    )
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid origin: {}", o)))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}

/// Build the Axum application router around prepared dependencies
pub fn build_router(deps: Arc<ServerDeps>, allowed_origins: &[String]) -> Result<Router> {
    // Create GraphQL schema (singleton)
    let schema = Arc::new(create_schema());

    let app_state = AxumAppState { deps: deps.clone() };
    let jwt_service = deps.jwt_service.clone();

    // Rate limiting: one token every 6s per IP, bursts of 10 (~10 requests/minute).
    // Each OTP request costs an SMS or email.
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(6)
            .burst_size(10)
            .use_headers() // Adds x-ratelimit-* response headers; keyed by peer IP
            .finish()
            .context("Invalid rate limiter configuration")?,
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let mut graphql_routes = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/batch", post(graphql_batch_handler));

    // GraphQL playground only in debug builds (development)
    #[cfg(debug_assertions)]
    {
        graphql_routes = graphql_routes.route("/graphql", get(graphql_playground));
    }

    let app = graphql_routes
        .layer(rate_limit_layer)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(create_graphql_context))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins)?),
        )
        // State (schema for GraphQL handlers)
        .with_state(schema);

    Ok(app)
}

/// Build the application from configuration
pub fn build_app(config: &Config, pool: PgPool, store: Arc<dyn BaseEphemeralStore>) -> Result<Router> {
    let deps = Arc::new(build_deps(config, pool, store));
    build_router(deps, &config.allowed_origins)
}
