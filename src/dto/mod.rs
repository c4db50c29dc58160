//! DTOs de la API
//!
//! Requests y responses JSON en camelCase, el contrato histórico del
//! frontend React. Las filas internas nunca cruzan esta frontera tal
//! cual: los ids salen como strings y el hash de contraseña no sale.

pub mod audit_log_dto;
pub mod auth_dto;
pub mod car_dto;
pub mod client_dto;
pub mod dashboard_dto;
pub mod manager_dto;
pub mod reservation_dto;

/// Conversión estándar de dinero para la frontera JSON
pub(crate) fn decimal_to_f64(value: sqlx::types::Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}
