use crate::db::DbClient;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

fn component_status<E: std::fmt::Display>(result: Result<(), E>) -> (bool, Value) {
    match result {
        Ok(()) => (true, json!("connected")),
        Err(e) => (
            false,
            json!({
                "status": "error",
                "message": e.to_string()
            }),
        ),
    }
}

/// Health check endpoint reporting Postgres and Redis connectivity
///
/// # Endpoint: GET /health
pub async fn health_check(State(db): State<DbClient>) -> (StatusCode, Json<Value>) {
    let (database_ok, database) = component_status(db.get_db_conn().await.map(|_| ()));
    let (redis_ok, redis) = component_status(db.get_async_redis_conn().await.map(|_| ()));

    let healthy = database_ok && redis_ok;
    let health_status = json!({
        "status": if healthy { "ok" } else { "degraded" },
        "database": database,
        "redis": redis,
        "timestamp": chrono::Utc::now()
    });

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}
