//! Ruta de consulta de la bitácora (solo admin)

use axum::{
    extract::{Query, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};

use crate::controllers::audit_log_controller::AuditLogController;
use crate::dto::audit_log_dto::{AuditLogPageResponse, AuditLogQuery};
use crate::middleware::auth::require_admin;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_audit_log_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_audit_logs))
        .route_layer(from_fn_with_state(state, require_admin))
}

async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogPageResponse>, AppError> {
    let controller = AuditLogController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}
