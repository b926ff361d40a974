use async_trait::async_trait;
use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::{Store, UserStore};
use crate::models::{new_object_id, Identity, LoginRequest, RegisterRequest, User, UserResponse};
use crate::utils::{gravatar_url, AppError};
use crate::validation::{validate_login, validate_register};

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    /// `Bearer <jwt>`, ready to be sent back in the Authorization header.
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurrentUserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Identity> for CurrentUserResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// Signs and verifies HS256 bearer tokens with the shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: (issued_at + self.ttl).timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry. Expired means expired: no leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected token: {}", e);
                AppError::Unauthorized
            })
    }
}

/// Turns a presented bearer credential into the caller's identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Identity, AppError>;
}

/// Verifies the token, then resolves the account it was issued for. Tokens of
/// deleted accounts are rejected even inside their validity window.
pub struct JwtStrategy {
    issuer: TokenIssuer,
    store: Arc<dyn Store>,
}

impl JwtStrategy {
    pub fn new(issuer: TokenIssuer, store: Arc<dyn Store>) -> Self {
        Self { issuer, store }
    }
}

#[async_trait]
impl Authenticator for JwtStrategy {
    async fn authenticate(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self.issuer.verify(token)?;

        match self.store.find_user_by_id(&claims.id).await? {
            Some(user) => Ok(Identity::from(&user)),
            None => {
                log::warn!("⚠️ Token for unknown user {}", claims.id);
                Err(AppError::Unauthorized)
            }
        }
    }
}

// User registration
pub async fn register(
    db: &dyn Store,
    request: &RegisterRequest,
    hash_cost: u32,
) -> Result<UserResponse, AppError> {
    let account = validate_register(request)?;

    if db.find_user_by_email(&account.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password = hash(&account.password, hash_cost)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: new_object_id(),
        avatar: gravatar_url(&account.email),
        name: account.name,
        email: account.email,
        password,
        date: Utc::now(),
    };

    // A concurrent registration can still win the race; the unique index
    // reports it as a duplicate, which converts to DuplicateEmail.
    db.insert_user(&user).await?;

    log::info!("✅ User registered successfully: {}", user.email);

    Ok(UserResponse::from(&user))
}

// User login
pub async fn login(
    db: &dyn Store,
    issuer: &TokenIssuer,
    request: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    let credentials = validate_login(request)?;

    let user = db
        .find_user_by_email(&credentials.email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let valid = verify(&credentials.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = issuer.issue(&user)?;

    Ok(LoginResponse {
        success: true,
        token: format!("Bearer {}", token),
    })
}

pub fn current_user(identity: &Identity) -> CurrentUserResponse {
    CurrentUserResponse::from(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    const COST: u32 = 4;

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Jane Doe".to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            password2: Some(password.to_string()),
        }
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn bearer(response: &LoginResponse) -> &str {
        response.token.strip_prefix("Bearer ").unwrap()
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_derives_avatar() {
        let store = MemoryStore::new();
        let user = register(&store, &registration("jane@example.com", "secret1"), COST)
            .await
            .unwrap();

        assert_eq!(user.email, "jane@example.com");
        assert!(user.avatar.starts_with("//www.gravatar.com/avatar/"));

        let stored = store.find_user_by_email("jane@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password, "secret1");
        assert!(verify("secret1", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let first = register(&store, &registration("jane@example.com", "secret1"), COST)
            .await
            .unwrap();

        let err = register(&store, &registration("jane@example.com", "other-pass"), COST)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let stored = store.find_user_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert!(verify("secret1", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let store = MemoryStore::new();
        let err = register(&store, &RegisterRequest::default(), COST).await.unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors.len(), 4),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let store = MemoryStore::new();
        let issuer = TokenIssuer::new("test-secret", 3600);
        let err = login(&store, &issuer, &credentials("nobody@example.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn test_wrong_password_issues_no_token() {
        let store = MemoryStore::new();
        let issuer = TokenIssuer::new("test-secret", 3600);
        register(&store, &registration("jane@example.com", "secret1"), COST)
            .await
            .unwrap();

        let result = login(&store, &issuer, &credentials("jane@example.com", "wrong-pass")).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_token_authenticates_issuing_user() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let issuer = TokenIssuer::new("test-secret", 3600);
        let user = register(store.as_ref(), &registration("jane@example.com", "secret1"), COST)
            .await
            .unwrap();

        let response = login(store.as_ref(), &issuer, &credentials("jane@example.com", "secret1"))
            .await
            .unwrap();
        assert!(response.success);
        assert!(response.token.starts_with("Bearer "));

        let strategy = JwtStrategy::new(issuer.clone(), store.clone());
        let identity = strategy.authenticate(bearer(&response)).await.unwrap();
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.email, "jane@example.com");

        let current = current_user(&identity);
        assert_eq!(current.id, user.id);
        assert_eq!(current.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let issuer = TokenIssuer::new("test-secret", 3600);
        register(store.as_ref(), &registration("jane@example.com", "secret1"), COST)
            .await
            .unwrap();
        let user = store.find_user_by_email("jane@example.com").await.unwrap().unwrap();

        let stale = issuer
            .issue_at(&user, Utc::now() - Duration::seconds(3601))
            .unwrap();
        let strategy = JwtStrategy::new(issuer, store);
        assert!(matches!(
            strategy.authenticate(&stale).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        register(store.as_ref(), &registration("jane@example.com", "secret1"), COST)
            .await
            .unwrap();
        let user = store.find_user_by_email("jane@example.com").await.unwrap().unwrap();

        let forged = TokenIssuer::new("someone-else", 3600).issue(&user).unwrap();
        let strategy = JwtStrategy::new(TokenIssuer::new("test-secret", 3600), store);
        assert!(matches!(
            strategy.authenticate(&forged).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            strategy.authenticate("not-a-jwt").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_claims_carry_identity_fields() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let user = User {
            id: "64b7f0c2a1b2c3d4e5f60718".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            avatar: "//www.gravatar.com/avatar/abc".to_string(),
            password: "hash".to_string(),
            date: Utc::now(),
        };
        let claims = issuer.verify(&issuer.issue(&user).unwrap()).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.name, "Jane");
        assert_eq!(claims.avatar, user.avatar);
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}
