use serde::Deserialize;
use validator::ValidateEmail;

use crate::domain::auth::Credentials;
use crate::forms::{FieldError, FormError};

const MIN_PASSWORD_LEN: usize = 6;

/// Admin sign-in input.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginForm {
    /// Email or username.
    pub identifier: String,
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let identifier = form.identifier.trim();
        if identifier.is_empty() {
            errors.push(FieldError::new(
                "identifier",
                "Email or Username is required.",
            ));
        } else if identifier.contains('@') && !identifier.to_string().validate_email() {
            errors.push(FieldError::new("identifier", "Please enter a valid email."));
        }

        if form.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required."));
        } else if form.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters.",
            ));
        }

        if !errors.is_empty() {
            return Err(FormError::Fields(errors));
        }

        Ok(Credentials {
            identifier: identifier.to_string(),
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(identifier: &str, password: &str) -> Result<Credentials, FormError> {
        Credentials::try_from(LoginForm {
            identifier: identifier.to_string(),
            password: password.to_string(),
        })
    }

    #[test]
    fn accepts_username_or_email() {
        assert!(login("admin", "secret1").is_ok());
        assert!(login("admin@example.com", "secret1").is_ok());
    }

    #[test]
    fn reports_each_field() {
        let err = login("", "").unwrap_err();
        assert_eq!(
            err.message_for("identifier").as_deref(),
            Some("Email or Username is required.")
        );
        assert_eq!(
            err.message_for("password").as_deref(),
            Some("Password is required.")
        );
    }

    #[test]
    fn rejects_malformed_email_and_short_password() {
        let err = login("admin@", "abc").unwrap_err();
        assert_eq!(
            err.message_for("identifier").as_deref(),
            Some("Please enter a valid email.")
        );
        assert_eq!(
            err.message_for("password").as_deref(),
            Some("Password must be at least 6 characters.")
        );
    }
}
