use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::lead::LeadSubmission;
use crate::domain::types::{LeadName, PhoneDigits, SanitizedText};
use crate::forms::{FieldError, FormError};

/// Enquiry widget input, field names as posted by the page.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeadForm {
    pub name: String,
    pub phone_number: String,
    pub destination: String,
    /// `YYYY-MM-DD` from a date input, empty when not chosen.
    pub date: String,
    pub message: String,
}

impl LeadForm {
    /// Applies the phone rules alone; used to show the inline error as soon as
    /// the visitor presses send.
    pub fn validate_phone(&self) -> Result<PhoneDigits, FormError> {
        PhoneDigits::new(self.phone_number.as_str())
            .map_err(|err| FormError::field("phoneNumber", err.to_string()))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl TryFrom<&LeadForm> for LeadSubmission {
    type Error = FormError;

    fn try_from(form: &LeadForm) -> Result<Self, Self::Error> {
        let phone = form.validate_phone()?;

        let mut errors = Vec::new();
        let name = LeadName::new(form.name.as_str())
            .map_err(|_| errors.push(FieldError::new("name", "Name is required")))
            .ok();

        let date = match form.date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(FieldError::new("date", "Enter a valid travel date"));
                    None
                }
            },
        };

        match name {
            Some(name) if errors.is_empty() => Ok(LeadSubmission {
                name,
                phone,
                destination: Some(form.destination.trim().to_string()).filter(|d| !d.is_empty()),
                date,
                message: SanitizedText::optional(form.message.as_str()),
            }),
            _ => Err(FormError::Fields(errors)),
        }
    }
}
