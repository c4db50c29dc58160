//! Roles y actor autenticado
//!
//! El rol viaja en la cookie de sesión; el middleware lo resuelve una
//! sola vez y lo inyecta como `Actor` en las extensiones del request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles de usuario del back-office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manager" => Some(UserRole::Manager),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Un admin satisface cualquier endpoint protegido por manager
    pub fn satisfies(&self, required: UserRole) -> bool {
        *self == required || *self == UserRole::Admin
    }
}

/// Identidad autenticada atribuida a cada operación
#[derive(Debug, Clone, Serialize)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        assert_eq!(UserRole::parse("manager"), Some(UserRole::Manager));
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("superuser"), None);
        assert_eq!(UserRole::Manager.as_str(), "manager");
    }

    #[test]
    fn test_admin_satisfies_manager_gate() {
        assert!(UserRole::Admin.satisfies(UserRole::Manager));
        assert!(UserRole::Admin.satisfies(UserRole::Admin));
        assert!(UserRole::Manager.satisfies(UserRole::Manager));
        assert!(!UserRole::Manager.satisfies(UserRole::Admin));
    }
}
