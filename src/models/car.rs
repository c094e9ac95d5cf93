use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::car::{Car, NewCar, RentalDetails, enabled_flags};
use crate::domain::types::{CarId, DocumentId, TypeConstraintError};
use crate::models::envelope::{MediaRecord, absolute_media_url};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalDetailsRecord {
    pub price_per_day: Option<f64>,
    pub price_per_hour: Option<f64>,
    pub minimum_booking_hours: Option<u32>,
    #[serde(default)]
    pub available: Option<bool>,
}

/// Car document as returned by the `cars` collection.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    pub id: i64,
    pub document_id: String,
    pub car_name: Option<String>,
    pub brand: Option<String>,
    pub model_year: Option<i32>,
    pub car_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub seating_capacity: Option<u32>,
    /// Stored either as a number or as free text.
    pub mileage: Option<Value>,
    pub color: Option<String>,
    pub registration_number: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<MediaRecord>>,
    pub rental_details: Option<RentalDetailsRecord>,
    pub features: Option<BTreeMap<String, Value>>,
    pub documents: Option<BTreeMap<String, Value>>,
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s).filter(|s| !s.trim().is_empty()),
        other => Some(other.to_string()),
    }
}

impl CarRecord {
    pub fn into_domain(self, media_base_url: &str) -> Result<Car, TypeConstraintError> {
        Ok(Car {
            id: CarId::new(self.id)?,
            document_id: DocumentId::new(self.document_id)?,
            name: self.car_name.unwrap_or_default(),
            brand: self.brand,
            model_year: self.model_year,
            car_type: self.car_type,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            seating_capacity: self.seating_capacity,
            mileage: self.mileage.and_then(value_text),
            color: self.color,
            registration_number: self.registration_number,
            images: self
                .images
                .unwrap_or_default()
                .into_iter()
                .map(|img| absolute_media_url(media_base_url, &img.url))
                .collect(),
            rental: self.rental_details.map(|r| RentalDetails {
                price_per_day: r.price_per_day,
                price_per_hour: r.price_per_hour,
                minimum_booking_hours: r.minimum_booking_hours,
                available: r.available.unwrap_or(false),
            }),
            features: self.features.as_ref().map(enabled_flags).unwrap_or_default(),
            documents: self
                .documents
                .as_ref()
                .map(enabled_flags)
                .unwrap_or_default(),
        })
    }
}

/// Body of car create/update requests.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarPayload {
    pub car_name: String,
    pub brand: String,
    pub model_year: i32,
    pub color: Option<String>,
    pub registration_number: Option<String>,
    pub fuel_type: String,
    pub transmission: String,
    pub seating_capacity: u32,
    pub car_type: String,
    pub mileage: Option<String>,
}

impl From<&NewCar> for CarPayload {
    fn from(car: &NewCar) -> Self {
        Self {
            car_name: car.name.as_str().to_string(),
            brand: car.brand.clone(),
            model_year: car.model_year,
            color: car.color.clone(),
            registration_number: car.registration_number.clone(),
            fuel_type: car.fuel_type.clone(),
            transmission: car.transmission.clone(),
            seating_capacity: car.seating_capacity,
            car_type: car.car_type.clone(),
            mileage: car.mileage.clone(),
        }
    }
}
