//! Rutas de autenticación: login, logout y estado de sesión
//!
//! Ninguna lleva gate de rol; el login emite la cookie de sesión y el
//! logout la borra.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthStatusResponse, LoginRequest, SessionUserResponse};
use crate::services::session;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/status", get(status))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let (user, token) = controller.login(request).await?;

    let cookie = session::session_cookie(&token, state.config.session_ttl_hours);
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(serde_json::json!({ "user": user })),
    )
        .into_response())
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Mejor esfuerzo: si la sesión no es válida igual se borra la cookie
    let actor = session::token_from_headers(&headers)
        .and_then(|token| session::verify_token(&token, &state.config).ok())
        .and_then(|claims| session::claims_to_actor(&claims).ok());

    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    controller.logout(actor.as_ref()).await;

    (
        StatusCode::OK,
        [(SET_COOKIE, session::clear_session_cookie())],
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    )
        .into_response()
}

async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatusResponse> {
    let user = session::token_from_headers(&headers)
        .and_then(|token| session::verify_token(&token, &state.config).ok())
        .and_then(|claims| session::claims_to_actor(&claims).ok())
        .map(|actor| SessionUserResponse::from(&actor));

    Json(AuthStatusResponse { user })
}
