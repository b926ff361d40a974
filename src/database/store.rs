use async_trait::async_trait;
use std::fmt;

use crate::models::{Education, Experience, Profile, ProfileUpdate, User};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A unique index rejected the write. Carries the indexed field.
    Duplicate(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate(key) => write!(f, "Duplicate value for unique field '{}'", key),
            StoreError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Account persistence (collection `users`).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>>;
    async fn find_users_by_ids(&self, ids: &[String]) -> StoreResult<Vec<User>>;
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn delete_user(&self, id: &str) -> StoreResult<bool>;
}

/// Profile persistence (collection `profiles`), keyed by owning user id.
///
/// Mutating operations return the profile as stored after the write, or
/// `None` when the user has no profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile_by_user(&self, user_id: &str) -> StoreResult<Option<Profile>>;
    async fn find_profile_by_handle(&self, handle: &str) -> StoreResult<Option<Profile>>;
    async fn list_profiles(&self) -> StoreResult<Vec<Profile>>;
    async fn insert_profile(&self, profile: &Profile) -> StoreResult<()>;
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<Profile>>;
    /// Inserts at the front of the experience list.
    async fn push_experience(
        &self,
        user_id: &str,
        entry: &Experience,
    ) -> StoreResult<Option<Profile>>;
    /// Inserts at the front of the education list.
    async fn push_education(
        &self,
        user_id: &str,
        entry: &Education,
    ) -> StoreResult<Option<Profile>>;
    async fn pull_experience(&self, user_id: &str, entry_id: &str)
        -> StoreResult<Option<Profile>>;
    async fn pull_education(&self, user_id: &str, entry_id: &str) -> StoreResult<Option<Profile>>;
    async fn delete_profile(&self, user_id: &str) -> StoreResult<bool>;
}

/// Everything the request handlers need from storage.
pub trait Store: UserStore + ProfileStore {}

impl<T: UserStore + ProfileStore> Store for T {}
