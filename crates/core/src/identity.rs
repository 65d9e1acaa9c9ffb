//! Registration input rules.
//!
//! A registration form arrives with every field optional so that missing
//! fields can be reported together; [`RegistrationForm::validate_into`] turns
//! it into a [`NewRegistration`] whose field formats are then checked with
//! `validator`.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

/// Raw registration payload.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RegistrationForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub telephone: Option<String>,
}

/// Contact and shipping details stored 1:1 with a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub firstname: String,
    pub lastname: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub telephone: String,
}

/// A registration with every required field present.
#[derive(Debug, Clone, Validate)]
pub struct NewRegistration {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,
    #[validate(custom(function = "validate_email_format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    pub profile: ProfileFields,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl RegistrationForm {
    /// Names of required fields that are absent or blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("city", &self.city),
            ("telephone", &self.telephone),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check presence, then formats, and return the normalized registration.
    ///
    /// The password is kept verbatim (no trimming).
    pub fn validate_into(self) -> Result<NewRegistration, CoreError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let registration = NewRegistration {
            username: present(&self.username).unwrap_or_default(),
            email: present(&self.email).unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            profile: ProfileFields {
                firstname: present(&self.firstname).unwrap_or_default(),
                lastname: present(&self.lastname).unwrap_or_default(),
                street_address: present(&self.street_address).unwrap_or_default(),
                city: present(&self.city).unwrap_or_default(),
                postal_code: present(&self.postal_code).unwrap_or_default(),
                telephone: present(&self.telephone).unwrap_or_default(),
            },
        };

        registration
            .validate()
            .map_err(|errs| CoreError::Validation(describe(&errs)))?;
        Ok(registration)
    }
}

/// An email needs an `@` and a `.` somewhere after the last `@`.
pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    let valid = match email.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("email_format")
            .with_message(Cow::Borrowed("Invalid email format")))
    }
}

/// Flatten validator errors into one sorted, human-readable message.
pub fn describe(errs: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errs
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            list.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn alice() -> RegistrationForm {
        RegistrationForm {
            username: Some("alice".into()),
            email: Some("alice@x.com".into()),
            password: Some("password1".into()),
            firstname: Some("Alice".into()),
            lastname: Some("Doe".into()),
            street_address: None,
            city: Some("Bangkok".into()),
            postal_code: None,
            telephone: Some("0800000000".into()),
        }
    }

    #[test]
    fn complete_form_validates() {
        let reg = alice().validate_into().expect("form is complete");
        assert_eq!(reg.username, "alice");
        assert_eq!(reg.profile.city, "Bangkok");
        assert_eq!(reg.profile.street_address, "");
    }

    #[test]
    fn blank_fields_are_reported_as_missing() {
        let form = RegistrationForm {
            city: Some("   ".into()),
            telephone: None,
            ..alice()
        };
        assert_eq!(form.missing_fields(), vec!["city", "telephone"]);
        assert_matches!(
            form.validate_into(),
            Err(CoreError::Validation(msg)) if msg == "Missing required fields: city, telephone"
        );
    }

    #[test]
    fn short_password_is_rejected() {
        let form = RegistrationForm {
            password: Some("12345".into()),
            ..alice()
        };
        assert_matches!(
            form.validate_into(),
            Err(CoreError::Validation(msg)) if msg.contains("at least 6 characters")
        );
    }

    #[test]
    fn six_character_password_is_accepted() {
        let form = RegistrationForm {
            password: Some("123456".into()),
            ..alice()
        };
        assert!(form.validate_into().is_ok());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email_format("alice@x.com").is_ok());
        assert!(validate_email_format("a.b@mail.example.org").is_ok());
        assert!(validate_email_format("alice.x.com").is_err());
        assert!(validate_email_format("alice@localhost").is_err());
        assert!(validate_email_format("@x.com").is_err());
        assert!(validate_email_format("al.ice@host").is_err());
    }

    #[test]
    fn bad_email_is_rejected() {
        let form = RegistrationForm {
            email: Some("alice@nowhere".into()),
            ..alice()
        };
        assert_matches!(
            form.validate_into(),
            Err(CoreError::Validation(msg)) if msg == "Invalid email format"
        );
    }
}
