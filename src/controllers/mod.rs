pub mod audit_log_controller;
pub mod auth_controller;
pub mod car_controller;
pub mod client_controller;
pub mod dashboard_controller;
pub mod manager_controller;
pub mod reservation_controller;
