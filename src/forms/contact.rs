use serde::Deserialize;
use validator::Validate;

use crate::domain::lead::ContactRequest;
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Contact page form.
pub struct ContactForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub message: String,
}

impl TryFrom<&ContactForm> for ContactRequest {
    type Error = FormError;

    fn try_from(form: &ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(ContactRequest {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            message: ammonia::clean(form.message.trim()),
        })
    }
}
