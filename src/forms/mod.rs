//! Raw user input and its validation.
//!
//! Forms hold exactly what the visitor or editor typed. Converting a form into
//! a domain payload is the only way to obtain something the repository layer
//! will send, so invalid input never reaches the network.

use std::fmt::Write as _;

use thiserror::Error;
use validator::ValidationErrors;

pub mod blog;
pub mod car;
pub mod contact;
pub mod lead;
pub mod login;

/// A message meant to be shown next to one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    let mut out = String::new();
    for (idx, err) in errors.iter().enumerate() {
        if idx > 0 {
            out.push_str("; ");
        }
        let _ = write!(out, "{}: {}", err.field, err.message);
    }
    out
}

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{}", describe(.0))]
    Fields(Vec<FieldError>),
}

impl FormError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::Fields(vec![FieldError::new(field, message)])
    }

    /// Inline message for a given input, if that input failed.
    pub fn message_for(&self, field: &str) -> Option<String> {
        match self {
            Self::Fields(errors) => errors
                .iter()
                .find(|err| err.field == field)
                .map(|err| err.message.clone()),
            Self::Validation(errors) => errors
                .field_errors()
                .get(field)
                .and_then(|list| list.first())
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                }),
        }
    }
}
