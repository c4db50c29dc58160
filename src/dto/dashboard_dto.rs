use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub total_managers: i64,
    pub total_system_users: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboardStatsResponse {
    pub total_cars: i64,
    pub available_cars: i64,
    pub rented_cars: i64,
    pub maintenance_cars: i64,
    pub total_clients: i64,
    pub active_reservations: i64,
    pub pending_reservations: i64,
    pub monthly_revenue: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClientResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentReservationResponse {
    pub id: String,
    pub client_name: String,
    pub car_model: String,
    pub start_date: DateTime<Utc>,
    pub status: String,
}
