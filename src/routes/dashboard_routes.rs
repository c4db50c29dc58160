//! Rutas de paneles: estadísticas de admin y dashboard del manager

use axum::{
    extract::{Extension, Query, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::{
    AdminStatsResponse, ManagerDashboardStatsResponse, RecentClientResponse,
    RecentQuery, RecentReservationResponse,
};
use crate::middleware::auth::{require_admin, require_manager};
use crate::models::auth::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin_stats))
        .route_layer(from_fn_with_state(state, require_admin))
}

pub fn create_manager_dashboard_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(manager_stats))
        .route("/recent-clients", get(recent_clients))
        .route("/recent-reservations", get(recent_reservations))
        .route_layer(from_fn_with_state(state, require_manager))
}

async fn admin_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<AdminStatsResponse>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.admin_stats(&actor).await?))
}

async fn manager_stats(
    State(state): State<AppState>,
) -> Result<Json<ManagerDashboardStatsResponse>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.manager_stats().await?))
}

async fn recent_clients(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<RecentClientResponse>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.recent_clients(query.limit).await?))
}

async fn recent_reservations(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<RecentReservationResponse>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.recent_reservations(query.limit).await?))
}
