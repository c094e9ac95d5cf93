use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{CarId, CarName, DocumentId};

/// Rental pricing attached to a car entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct RentalDetails {
    pub price_per_day: Option<f64>,
    pub price_per_hour: Option<f64>,
    pub minimum_booking_hours: Option<u32>,
    pub available: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Car {
    pub id: CarId,
    pub document_id: DocumentId,
    pub name: String,
    pub brand: Option<String>,
    pub model_year: Option<i32>,
    pub car_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub seating_capacity: Option<u32>,
    pub mileage: Option<String>,
    pub color: Option<String>,
    pub registration_number: Option<String>,
    /// Absolute image URLs, first one is the cover.
    pub images: Vec<String>,
    pub rental: Option<RentalDetails>,
    /// Feature labels that are switched on (e.g. "air conditioning").
    pub features: Vec<String>,
    /// Paperwork labels marked as present.
    pub documents: Vec<String>,
}

impl Car {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Payload used to create or replace a car entry from the admin console.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCar {
    pub name: CarName,
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

/// Turns a camelCase flag key into a readable label: `airConditioning` becomes
/// `air conditioning`.
pub fn humanize_flag(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if !label.is_empty() {
                label.push(' ');
            }
            label.push(ch.to_ascii_lowercase());
        } else {
            label.push(ch);
        }
    }
    label
}

/// Collects the labels of enabled flags. Booleans count when `true`, numbers
/// always count.
pub fn enabled_flags(flags: &BTreeMap<String, serde_json::Value>) -> Vec<String> {
    flags
        .iter()
        .filter(|(_, value)| value.as_bool() == Some(true) || value.is_number())
        .map(|(key, _)| humanize_flag(key))
        .collect()
}
