pub mod audit_log_repository;
pub mod car_repository;
pub mod client_repository;
pub mod reservation_repository;
pub mod user_repository;
