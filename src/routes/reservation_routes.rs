//! Rutas de reservas: todas tras el gate de manager
//!
//! El estado tiene su propia ruta; el update genérico no lo acepta.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationResponse, UpdateReservationRequest,
    UpdateReservationStatusRequest,
};
use crate::middleware::auth::require_manager;
use crate::models::auth::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations))
        .route("/", post(create_reservation))
        .route("/:id", get(get_reservation))
        .route("/:id", put(update_reservation))
        .route("/:id", delete(delete_reservation))
        .route("/:id/status", put(update_reservation_status))
        .route_layer(from_fn_with_state(state, require_manager))
}

async fn create_reservation(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let controller = ReservationController::new(state.pool.clone());
    let reservation = controller.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReservationResponse>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn list_reservations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn update_reservation(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.update(&actor, &id, request).await?))
}

async fn update_reservation_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<UpdateReservationStatusRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.transition_status(&actor, &id, request).await?))
}

async fn delete_reservation(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    controller.delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
