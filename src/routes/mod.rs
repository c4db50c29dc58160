//! Composición del router de la API
//!
//! Un router por recurso, cada uno con su gate de rol, anidados bajo
//! /api. Los pings de vida van sueltos, sin autenticación.

pub mod audit_log_routes;
pub mod auth_routes;
pub mod car_routes;
pub mod client_routes;
pub mod dashboard_routes;
pub mod manager_routes;
pub mod reservation_routes;

use axum::{extract::State, routing::get, Json, Router};

use crate::database::connection;
use crate::models::audit::AuditStatus;
use crate::services::audit_logger::AuditLogger;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/db_ping", get(db_ping))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/cars", car_routes::create_car_router(state.clone()))
        .nest(
            "/api/clients",
            client_routes::create_client_router(state.clone()),
        )
        .nest(
            "/api/managers",
            manager_routes::create_manager_router(state.clone()),
        )
        .nest(
            "/api/reservations",
            reservation_routes::create_reservation_router(state.clone()),
        )
        .nest(
            "/api/audit-logs",
            audit_log_routes::create_audit_log_router(state.clone()),
        )
        .nest(
            "/api/admin",
            dashboard_routes::create_admin_router(state.clone()),
        )
        .nest(
            "/api/manager/dashboard",
            dashboard_routes::create_manager_dashboard_router(state),
        )
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong! LocaCar Manager API is alive!" }))
}

async fn db_ping(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    match connection::ping(&state.pool).await {
        Ok(()) => Ok(Json(
            serde_json::json!({ "message": "Database connection successful!" }),
        )),
        Err(e) => {
            tracing::error!("Database connection error: {}", e);
            // Evento de sistema, sin actor: queda atribuido a "system"
            AuditLogger::new(state.pool.clone())
                .record(
                    "db_ping_failed",
                    "system",
                    None,
                    AuditStatus::Failure,
                    None,
                    Some(serde_json::json!({ "error": e.to_string() })),
                )
                .await;
            Err(AppError::Internal(format!(
                "Database connection failed: {}",
                e
            )))
        }
    }
}
