use super::{is_email, length_between, present};
use crate::models::RegisterRequest;
use crate::utils::FieldErrors;

/// Registration input that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_register(input: &RegisterRequest) -> Result<NewAccount, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = present(&input.name).unwrap_or_default();
    if name.is_empty() {
        errors.insert("name", "Name field is required");
    } else if !length_between(name, 2, 30) {
        errors.insert("name", "Name must be between 2 and 30 characters");
    }

    let email = present(&input.email).unwrap_or_default();
    if email.is_empty() {
        errors.insert("email", "Email field is required");
    } else if !is_email(email) {
        errors.insert("email", "Email is invalid");
    }

    // Passwords are taken verbatim, surrounding spaces included.
    let password = input.password.as_deref().unwrap_or_default();
    if password.is_empty() {
        errors.insert("password", "Password field is required");
    } else if !length_between(password, 6, 30) {
        errors.insert("password", "Password must be at least 6 characters");
    }

    let password2 = input.password2.as_deref().unwrap_or_default();
    if password2.is_empty() {
        errors.insert("password2", "Confirm Password field is required");
    } else if password2 != password {
        errors.insert("password2", "Passwords must match");
    }

    errors.into_result(NewAccount {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str, password2: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            password2: Some(password2.to_string()),
        }
    }

    #[test]
    fn test_valid_registration() {
        let account = validate_register(&request(" Jane ", "jane@example.com", "secret1", "secret1")).unwrap();
        assert_eq!(account.name, "Jane");
        assert_eq!(account.email, "jane@example.com");
        assert_eq!(account.password, "secret1");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = validate_register(&RegisterRequest::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("Name field is required"));
        assert_eq!(errors.get("email"), Some("Email field is required"));
        assert_eq!(errors.get("password"), Some("Password field is required"));
        assert_eq!(errors.get("password2"), Some("Confirm Password field is required"));
    }

    #[test]
    fn test_format_and_length_rules() {
        let errors = validate_register(&request("J", "not-an-email", "abc", "abd")).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be between 2 and 30 characters"));
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
        assert_eq!(errors.get("password2"), Some("Passwords must match"));
    }
}
