use serde::Serialize;

use crate::forms::lead::LeadForm;

/// Transient message shown by the enquiry widget.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    /// Blocking alert after a failed submission.
    Alert(String),
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct WidgetSnapshot {
    pub is_open: bool,
    pub has_submitted: bool,
    pub submitting: bool,
    pub form: LeadForm,
    pub phone_error: Option<String>,
    pub notice: Option<Notice>,
}
