//! Rutas de managers: todas tras el gate de admin

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::manager_controller::ManagerController;
use crate::dto::manager_dto::{CreateManagerRequest, ManagerResponse, UpdateManagerRequest};
use crate::middleware::auth::require_admin;
use crate::models::auth::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_manager_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_managers))
        .route("/", post(create_manager))
        .route("/:id", get(get_manager))
        .route("/:id", put(update_manager))
        .route("/:id", delete(delete_manager))
        .route_layer(from_fn_with_state(state, require_admin))
}

async fn create_manager(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateManagerRequest>,
) -> Result<(StatusCode, Json<ManagerResponse>), AppError> {
    let controller = ManagerController::new(state.pool.clone());
    let manager = controller.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(manager)))
}

async fn get_manager(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ManagerResponse>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn list_managers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ManagerResponse>>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn update_manager(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<UpdateManagerRequest>,
) -> Result<Json<ManagerResponse>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    Ok(Json(controller.update(&actor, &id, request).await?))
}

async fn delete_manager(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    controller.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
