//! Modelos de dominio
//!
//! Structs de fila (sqlx::FromRow) y enums de estado/rol.

pub mod audit;
pub mod auth;
pub mod car;
pub mod client;
pub mod reservation;
pub mod user;
