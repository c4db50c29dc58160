//! Rutas de clientes: CRUD para manager, borrado solo admin

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::client_controller::ClientController;
use crate::dto::client_dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::middleware::auth::{require_admin, require_manager};
use crate::models::auth::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_client_router(state: AppState) -> Router<AppState> {
    let manager_ops = Router::new()
        .route("/", get(list_clients))
        .route("/", post(create_client))
        .route("/:id", get(get_client))
        .route("/:id", put(update_client))
        .route_layer(from_fn_with_state(state.clone(), require_manager));

    let admin_ops = Router::new()
        .route("/:id", delete(delete_client))
        .route_layer(from_fn_with_state(state, require_admin));

    manager_ops.merge(admin_ops)
}

async fn create_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    let controller = ClientController::new(state.pool.clone());
    let client = controller.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClientResponse>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn update_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.update(&actor, &id, request).await?))
}

async fn delete_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let controller = ClientController::new(state.pool.clone());
    controller.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
