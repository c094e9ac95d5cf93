use crate::domain::lead::ContactRequest;
use crate::forms::contact::ContactForm;
use crate::repository::ContactWriter;
use crate::services::ServiceResult;

/// Validates and posts the contact page form.
pub async fn submit_contact<R>(repo: &R, form: &ContactForm) -> ServiceResult<()>
where
    R: ContactWriter + ?Sized,
{
    let request = ContactRequest::try_from(form)?;
    repo.submit_contact(&request).await.map_err(|err| {
        log::error!("Failed to submit contact form: {err}");
        err.into()
    })
}
