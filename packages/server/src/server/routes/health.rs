use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use std::time::Duration;

use crate::server::app::AxumAppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: ComponentHealth,
    store: ComponentHealth,
    connection_pool: ConnectionPoolHealth,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(message),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Serialize)]
pub struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
    max_connections: u32,
}

/// Health check endpoint
///
/// Checks database and ephemeral store connectivity. Returns 200 OK if both
/// respond, 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let db_pool = &state.deps.db_pool;

    let database = match tokio::time::timeout(
        CHECK_TIMEOUT,
        sqlx::query("SELECT 1").execute(db_pool),
    )
    .await
    {
        Ok(Ok(_)) => ComponentHealth::ok(),
        Ok(Err(e)) => ComponentHealth::error(format!("Query failed: {}", e)),
        Err(_) => ComponentHealth::error("Query timeout (>5s)".to_string()),
    };

    let store = match tokio::time::timeout(CHECK_TIMEOUT, state.deps.store.ping()).await {
        Ok(Ok(())) => ComponentHealth::ok(),
        Ok(Err(e)) => ComponentHealth::error(format!("Ping failed: {}", e)),
        Err(_) => ComponentHealth::error("Ping timeout (>5s)".to_string()),
    };

    let connection_pool = ConnectionPoolHealth {
        size: db_pool.size(),
        idle_connections: db_pool.num_idle(),
        max_connections: db_pool.options().get_max_connections(),
    };

    let is_healthy = database.is_ok() && store.is_ok();
    let (status_code, status) = if is_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            database,
            store,
            connection_pool,
        }),
    )
}
