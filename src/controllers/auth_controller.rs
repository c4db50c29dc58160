//! Controller de autenticación

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{LoginRequest, SessionUserResponse};
use crate::models::audit::AuditStatus;
use crate::models::auth::{Actor, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::services::audit_logger::AuditLogger;
use crate::services::session;
use crate::utils::errors::AppError;

pub struct AuthController {
    users: UserRepository,
    audit: AuditLogger,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            audit: AuditLogger::new(pool),
            config,
        }
    }

    /// Verifica credenciales y emite el token de sesión.
    /// Devuelve el resumen de usuario y el token para la cookie.
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<(SessionUserResponse, String), AppError> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Username and password required".to_string(),
            ));
        }

        let user = self.users.find_by_username(&request.username).await?;

        let user = match user {
            Some(user)
                if bcrypt::verify(&request.password, &user.password_hash)
                    .map_err(|e| AppError::Hash(e.to_string()))? =>
            {
                user
            }
            _ => {
                self.audit
                    .record(
                        "LOGIN_FAILURE",
                        "USER",
                        None,
                        AuditStatus::Failure,
                        None,
                        Some(serde_json::json!({ "username": request.username })),
                    )
                    .await;
                return Err(AppError::Unauthorized(
                    "Invalid username or password".to_string(),
                ));
            }
        };

        if !user.is_active {
            return Err(AppError::Forbidden(
                "Account is deactivated. Please contact administrator.".to_string(),
            ));
        }

        let role = UserRole::parse(&user.role).ok_or_else(|| {
            AppError::Internal(format!("User '{}' has unknown role", user.username))
        })?;

        let actor = Actor {
            id: user.id,
            username: user.username.clone(),
            role,
            full_name: Some(user.full_name.clone()),
        };

        let token = session::issue_token(&actor, &self.config)?;

        self.audit
            .record(
                "LOGIN_SUCCESS",
                "USER",
                Some(user.id),
                AuditStatus::Success,
                Some(&actor),
                None,
            )
            .await;

        Ok((SessionUserResponse::from(&user), token))
    }

    pub async fn logout(&self, actor: Option<&Actor>) {
        if let Some(actor) = actor {
            self.audit
                .record(
                    "LOGOUT",
                    "USER",
                    Some(actor.id),
                    AuditStatus::Success,
                    Some(actor),
                    None,
                )
                .await;
        }
    }
}
