use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::types::{LeadName, PhoneDigits, SanitizedText};

/// Key of the persisted flag recording that the visitor already enquired.
pub const FORM_SUBMITTED_KEY: &str = "formSubmitted";

/// A validated enquiry ready for dispatch. Built only from a form that passed
/// validation, so it is never sent partially.
#[derive(Clone, Debug, PartialEq)]
pub struct LeadSubmission {
    pub name: LeadName,
    pub phone: PhoneDigits,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub message: Option<SanitizedText>,
}

/// Contact page enquiry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}
