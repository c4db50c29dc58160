use serde::{Deserialize, Serialize};

use crate::models::auth::Actor;
use crate::models::user::User;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Resumen de usuario que viaja en las respuestas de auth
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserResponse {
    pub id: String,
    pub username: String,
    pub role: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl From<&User> for SessionUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            full_name: Some(user.full_name.clone()),
            is_active: user.is_active,
        }
    }
}

impl From<&Actor> for SessionUserResponse {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id.to_string(),
            username: actor.username.clone(),
            role: actor.role.as_str().to_string(),
            full_name: actor.full_name.clone(),
            // La sesión solo se emite para cuentas activas
            is_active: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub user: Option<SessionUserResponse>,
}
