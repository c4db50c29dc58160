use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::decimal_to_f64;
use crate::models::car::Car;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    #[validate(length(min = 1))]
    pub make: String,
    #[validate(length(min = 1))]
    pub model: String,
    pub year: i32,
    #[validate(length(min = 1))]
    pub license_plate: String,
    #[validate(length(min = 1))]
    pub vin: String,
    pub color: Option<String>,
    pub daily_rate: f64,
    pub status: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub color: Option<String>,
    pub daily_rate: Option<f64>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: String,
    pub color: Option<String>,
    pub daily_rate: f64,
    pub status: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub added_at: DateTime<Utc>,
    pub added_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id.to_string(),
            make: car.make,
            model: car.model,
            year: car.year,
            license_plate: car.license_plate,
            vin: car.vin,
            color: car.color,
            daily_rate: decimal_to_f64(car.daily_rate),
            status: car.status,
            image_url: car.image_url,
            description: car.description,
            added_at: car.added_at,
            added_by: car.added_by.map(|id| id.to_string()),
            updated_at: car.updated_at,
            updated_by: car.updated_by.map(|id| id.to_string()),
        }
    }
}
