//! Sesiones firmadas
//!
//! La sesión es un token HS256 que viaja en una cookie HttpOnly y
//! lleva `{user_id, username, role}`. También se acepta el token por
//! header `Authorization: Bearer` para clientes sin cookies.

use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::models::auth::{Actor, UserRole};
use crate::utils::errors::AppError;

/// Nombre de la cookie de sesión
pub const SESSION_COOKIE: &str = "session";

/// Claims del token de sesión
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub full_name: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Emitir un token de sesión para un usuario autenticado
pub fn issue_token(actor: &Actor, config: &EnvironmentConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::hours(config.session_ttl_hours);

    let claims = SessionClaims {
        sub: actor.id.to_string(),
        username: actor.username.clone(),
        role: actor.role.as_str().to_string(),
        full_name: actor.full_name.clone(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.session_secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Session(format!("Error issuing session token: {}", e)))
}

/// Verificar y decodificar un token de sesión
pub fn verify_token(token: &str, config: &EnvironmentConfig) -> Result<SessionClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.session_secret.as_ref());

    let token_data = decode::<SessionClaims>(token, &decoding_key, &Validation::default())
        .map_err(|_| AppError::Session("Invalid or expired session.".to_string()))?;

    Ok(token_data.claims)
}

/// Convertir claims verificados en el actor explícito de la petición
pub fn claims_to_actor(claims: &SessionClaims) -> Result<Actor, AppError> {
    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Session("Malformed session subject.".to_string()))?;
    let role = UserRole::parse(&claims.role)
        .ok_or_else(|| AppError::Session("Unknown session role.".to_string()))?;

    Ok(Actor {
        id,
        username: claims.username.clone(),
        role,
        full_name: claims.full_name.clone(),
    })
}

/// Construir el header Set-Cookie de login
pub fn session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE,
        token,
        ttl_hours * 3600
    )
}

/// Construir el header Set-Cookie que borra la sesión
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", SESSION_COOKIE)
}

/// Extraer el token de sesión de los headers: primero la cookie,
/// después Authorization: Bearer
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie_header) = headers.get("Cookie").and_then(|h| h.to_str().ok()) {
        for pair in cookie_header.split(';') {
            let pair = pair.trim();
            if let Some(value) = pair.strip_prefix(&format!("{}=", SESSION_COOKIE)) {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::test_config;
    use axum::http::HeaderValue;

    fn actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            username: "amina".to_string(),
            role: UserRole::Manager,
            full_name: Some("Amina B.".to_string()),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let config = test_config();
        let actor = actor();

        let token = issue_token(&actor, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        let resolved = claims_to_actor(&claims).unwrap();

        assert_eq!(resolved.id, actor.id);
        assert_eq!(resolved.username, "amina");
        assert_eq!(resolved.role, UserRole::Manager);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let config = test_config();
        let mut other = test_config();
        other.session_secret = "another-secret".to_string();

        let token = issue_token(&actor(), &config).unwrap();
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let config = test_config();
        let now = chrono::Utc::now();
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            username: "amina".to_string(),
            role: "manager".to_string(),
            full_name: None,
            iat: (now - chrono::Duration::hours(10)).timestamp() as usize,
            exp: (now - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.session_secret.as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Cookie",
            HeaderValue::from_static("theme=dark; session=abc.def.ghi; lang=fr"),
        );
        assert_eq!(token_from_headers(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_token_from_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers), Some("xyz".to_string()));
    }

    #[test]
    fn test_token_absent() {
        let headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);
    }
}
