//! Modelo de coche

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estados posibles de un coche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Rented,
    Maintenance,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Rented => "rented",
            CarStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(CarStatus::Available),
            "rented" => Some(CarStatus::Rented),
            "maintenance" => Some(CarStatus::Maintenance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Car {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: String,
    pub color: Option<String>,
    pub daily_rate: sqlx::types::Decimal,
    pub status: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub added_at: DateTime<Utc>,
    pub added_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

/// Proyección mínima para lecturas desnormalizadas de reservas
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CarSummary {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub vin: String,
    pub status: String,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_status_parse() {
        assert_eq!(CarStatus::parse("available"), Some(CarStatus::Available));
        assert_eq!(CarStatus::parse("rented"), Some(CarStatus::Rented));
        assert_eq!(CarStatus::parse("maintenance"), Some(CarStatus::Maintenance));
        assert_eq!(CarStatus::parse("sold"), None);
    }
}
