//! Rutas de coches: lecturas para manager, escrituras solo admin

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::car_controller::CarController;
use crate::dto::car_dto::{CarResponse, CreateCarRequest, UpdateCarRequest};
use crate::middleware::auth::{require_admin, require_manager};
use crate::models::auth::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(state: AppState) -> Router<AppState> {
    let reads = Router::new()
        .route("/", get(list_cars))
        .route("/:id", get(get_car))
        .route_layer(from_fn_with_state(state.clone(), require_manager));

    let writes = Router::new()
        .route("/", post(create_car))
        .route("/:id", put(update_car))
        .route("/:id", delete(delete_car))
        .route_layer(from_fn_with_state(state, require_admin));

    reads.merge(writes)
}

async fn create_car(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<CarResponse>), AppError> {
    let controller = CarController::new(state.pool.clone());
    let car = controller.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CarResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn list_cars(State(state): State<AppState>) -> Result<Json<Vec<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn update_car(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<CarResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.update(&actor, &id, request).await?))
}

async fn delete_car(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let controller = CarController::new(state.pool.clone());
    controller.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
