//! Modelo de usuario (managers y admins)

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Fila completa de la tabla users. El hash de contraseña vive aquí y
/// nunca debe cruzar la frontera HTTP; los DTOs lo excluyen siempre.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Proyección mínima para lecturas desnormalizadas de reservas
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
}
