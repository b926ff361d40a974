use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::database::StoreError;

/// Field name -> human readable message, the body of every 4xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Keeps the first message recorded for a field.
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(value)` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_valid() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Validation(FieldErrors),
    DuplicateEmail,
    DuplicateHandle,
    InvalidCredentials,
    UserNotFound,
    ProfileNotFound,
    NoProfiles,
    Unauthorized,
    DatabaseError(String),
    Internal(String),
}

impl AppError {
    /// Client facing body for the 4xx variants.
    pub fn fields(&self) -> FieldErrors {
        match self {
            AppError::Validation(errors) => errors.clone(),
            AppError::DuplicateEmail => FieldErrors::single("email", "Email already exists"),
            AppError::DuplicateHandle => FieldErrors::single("handle", "That handle already exists"),
            AppError::InvalidCredentials => FieldErrors::single("password", "Password incorrect"),
            AppError::UserNotFound => FieldErrors::single("email", "User not found"),
            AppError::ProfileNotFound => {
                FieldErrors::single("noprofile", "There is no profile for this user")
            }
            AppError::NoProfiles => FieldErrors::single("noprofile", "There are no profiles"),
            AppError::Unauthorized => FieldErrors::single("unauthorized", "Unauthorized"),
            AppError::DatabaseError(_) | AppError::Internal(_) => {
                FieldErrors::single("error", "Internal server error")
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => write!(f, "Invalid request: {} field error(s)", errors.len()),
            AppError::DuplicateEmail => write!(f, "Email already exists"),
            AppError::DuplicateHandle => write!(f, "Handle already exists"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::UserNotFound => write!(f, "User not found"),
            AppError::ProfileNotFound => write!(f, "Profile not found"),
            AppError::NoProfiles => write!(f, "No profiles"),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(key) if key == "email" => AppError::DuplicateEmail,
            StoreError::Duplicate(key) if key == "handle" => AppError::DuplicateHandle,
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::DuplicateEmail
            | AppError::DuplicateHandle
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::UserNotFound | AppError::ProfileNotFound | AppError::NoProfiles => {
                StatusCode::NOT_FOUND
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Same plain body passport-style clients expect.
            AppError::Unauthorized => HttpResponse::Unauthorized().body("Unauthorized"),
            AppError::DatabaseError(_) | AppError::Internal(_) => {
                log::error!("❌ {}", self);
                HttpResponse::build(self.status_code()).json(self.fields())
            }
            _ => HttpResponse::build(self.status_code()).json(self.fields()),
        }
    }
}

/// `JsonConfig` error handler: unreadable bodies answer with the same
/// field-keyed 400 as any other validation failure.
pub fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("❌ {} {} - bad request body: {}", req.method(), req.path(), err);

    let message = match err {
        JsonPayloadError::ContentType => "Request body must be JSON".to_string(),
        other => other.to_string(),
    };
    AppError::Validation(FieldErrors::single("body", &message)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "Name field is required");
        errors.insert("name", "Name must be between 2 and 30 characters");
        assert_eq!(errors.get("name"), Some("Name field is required"));
        assert!(!errors.is_valid());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::DatabaseError("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_duplicate_maps_to_conflict() {
        assert!(matches!(
            AppError::from(StoreError::Duplicate("email".into())),
            AppError::DuplicateEmail
        ));
        assert!(matches!(
            AppError::from(StoreError::Duplicate("handle".into())),
            AppError::DuplicateHandle
        ));
        assert!(matches!(
            AppError::from(StoreError::Backend("timeout".into())),
            AppError::DatabaseError(_)
        ));
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let body = serde_json::to_value(AppError::Internal("secret detail".into()).fields()).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }
}
