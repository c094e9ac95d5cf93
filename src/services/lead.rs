//! Enquiry widget submission.

use crate::domain::lead::LeadSubmission;
use crate::forms::lead::LeadForm;
use crate::repository::LeadWriter;
use crate::services::ServiceResult;

/// Validates the widget form. The phone number is checked first so its
/// message wins when several fields are wrong.
pub fn validate_lead(form: &LeadForm) -> ServiceResult<LeadSubmission> {
    form.validate_phone()?;
    Ok(LeadSubmission::try_from(form)?)
}

/// Sends an already validated lead.
pub async fn submit_lead<R>(repo: &R, lead: &LeadSubmission) -> ServiceResult<()>
where
    R: LeadWriter + ?Sized,
{
    repo.create_message(lead).await.map_err(|err| {
        log::error!("Failed to submit lead: {err}");
        err.into()
    })
}
