use chrono::{Datelike, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::car::{Car, NewCar};
use crate::domain::types::CarName;
use crate::forms::FormError;

#[derive(Clone, Debug, Deserialize, Validate, PartialEq, Eq)]
/// Admin car editor input.
pub struct CarForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub brand: String,
    #[validate(range(min = 1950, max = 2100))]
    pub model_year: i32,
    pub color: String,
    pub registration_number: String,
    pub fuel_type: String,
    pub transmission: String,
    #[validate(range(min = 1, max = 60))]
    pub seating_capacity: u32,
    pub car_type: String,
    pub mileage: String,
}

impl Default for CarForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            brand: String::new(),
            model_year: Utc::now().year(),
            color: String::new(),
            registration_number: String::new(),
            fuel_type: "Petrol".to_string(),
            transmission: "Manual".to_string(),
            seating_capacity: 5,
            car_type: "Sedan".to_string(),
            mileage: String::new(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<&Car> for CarForm {
    fn from(car: &Car) -> Self {
        let defaults = Self::default();
        Self {
            name: car.name.clone(),
            brand: car.brand.clone().unwrap_or_default(),
            model_year: car.model_year.unwrap_or(defaults.model_year),
            color: car.color.clone().unwrap_or_default(),
            registration_number: car.registration_number.clone().unwrap_or_default(),
            fuel_type: car.fuel_type.clone().unwrap_or(defaults.fuel_type),
            transmission: car.transmission.clone().unwrap_or(defaults.transmission),
            seating_capacity: car.seating_capacity.unwrap_or(defaults.seating_capacity),
            car_type: car.car_type.clone().unwrap_or(defaults.car_type),
            mileage: car.mileage.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<&CarForm> for NewCar {
    type Error = FormError;

    fn try_from(form: &CarForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = CarName::new(form.name.as_str())
            .map_err(|err| FormError::field("name", err.to_string()))?;

        Ok(NewCar {
            name,
            brand: form.brand.trim().to_string(),
            model_year: form.model_year,
            color: non_blank(&form.color),
            registration_number: non_blank(&form.registration_number),
            fuel_type: form.fuel_type.trim().to_string(),
            transmission: form.transmission.trim().to_string(),
            seating_capacity: form.seating_capacity,
            car_type: form.car_type.trim().to_string(),
            mileage: non_blank(&form.mileage),
        })
    }
}
