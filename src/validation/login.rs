use super::{is_email, present};
use crate::models::LoginRequest;
use crate::utils::FieldErrors;

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn validate_login(input: &LoginRequest) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = present(&input.email).unwrap_or_default();
    if email.is_empty() {
        errors.insert("email", "Email field is required");
    } else if !is_email(email) {
        errors.insert("email", "Email is invalid");
    }

    let password = input.password.as_deref().unwrap_or_default();
    if password.is_empty() {
        errors.insert("password", "Password field is required");
    }

    errors.into_result(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}
