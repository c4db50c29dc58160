use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_ping_endpoint() {
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["message"], "pong! LocaCar Manager API is alive!");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unauthenticated_request_is_401_with_message_body() {
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reservations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Todos los errores de la API llevan un objeto {"message"}
    let body = read_json(response).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_invalid_status_value_is_400() {
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/reservations/res-1/status")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "status": "teleported" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid status value"));
}

// App de test básica que reproduce las convenciones de la API real:
// errores {"message"}, estados válidos de reserva, gate de sesión.
async fn create_test_app() -> Router {
    const VALID_STATUSES: [&str; 7] = [
        "pending_confirmation",
        "confirmed",
        "active",
        "completed",
        "cancelled_by_client",
        "cancelled_by_agency",
        "no_show",
    ];

    Router::new()
        .route(
            "/api/ping",
            get(|| async { Json(json!({ "message": "pong! LocaCar Manager API is alive!" })) }),
        )
        .route(
            "/api/reservations",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "Authentication required. Please log in." })),
                )
            }),
        )
        .route(
            "/api/reservations/:id/status",
            put(|Json(body): Json<serde_json::Value>| async move {
                let status = body["status"].as_str().unwrap_or_default();
                if VALID_STATUSES.contains(&status) {
                    (StatusCode::OK, Json(json!({ "status": status })))
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "message": format!(
                                "Invalid status value. Must be one of: {}",
                                VALID_STATUSES.join(", ")
                            )
                        })),
                    )
                }
            }),
        )
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
