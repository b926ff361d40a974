use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{ProfileStore, StoreError, StoreResult, UserStore};
use crate::models::{Education, Experience, Profile, ProfileUpdate, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    profiles: Vec<Profile>,
}

/// In-process store with the same unique constraints as the MongoDB indexes.
/// Selected with `DATABASE_URL=memory://`; contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify_profile<F>(&self, user_id: &str, modify: F) -> StoreResult<Option<Profile>>
    where
        F: FnOnce(&mut Profile) + Send,
    {
        let mut inner = self.inner.write().await;
        Ok(inner
            .profiles
            .iter_mut()
            .find(|profile| profile.user == user_id)
            .map(|profile| {
                modify(profile);
                profile.clone()
            }))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[String]) -> StoreResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }
        if inner.users.iter().any(|existing| existing.id == user.id) {
            return Err(StoreError::Duplicate("_id".to_string()));
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|user| user.id != id);
        Ok(inner.users.len() != before)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile_by_user(&self, user_id: &str) -> StoreResult<Option<Profile>> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.iter().find(|profile| profile.user == user_id).cloned())
    }

    async fn find_profile_by_handle(&self, handle: &str) -> StoreResult<Option<Profile>> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.iter().find(|profile| profile.handle == handle).cloned())
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.clone())
    }

    async fn insert_profile(&self, profile: &Profile) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        // Owner clash first: upsert turns it into an update.
        if inner.profiles.iter().any(|existing| existing.user == profile.user) {
            return Err(StoreError::Duplicate("user".to_string()));
        }
        if inner.profiles.iter().any(|existing| existing.handle == profile.handle) {
            return Err(StoreError::Duplicate("handle".to_string()));
        }
        inner.profiles.push(profile.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<Profile>> {
        let mut inner = self.inner.write().await;
        if let Some(handle) = update.handle.as_set() {
            let taken = inner
                .profiles
                .iter()
                .any(|profile| profile.handle == *handle && profile.user != user_id);
            if taken {
                return Err(StoreError::Duplicate("handle".to_string()));
            }
        }
        Ok(inner
            .profiles
            .iter_mut()
            .find(|profile| profile.user == user_id)
            .map(|profile| {
                update.apply(profile);
                profile.clone()
            }))
    }

    async fn push_experience(
        &self,
        user_id: &str,
        entry: &Experience,
    ) -> StoreResult<Option<Profile>> {
        let entry = entry.clone();
        self.modify_profile(user_id, move |profile| profile.experience.insert(0, entry))
            .await
    }

    async fn push_education(
        &self,
        user_id: &str,
        entry: &Education,
    ) -> StoreResult<Option<Profile>> {
        let entry = entry.clone();
        self.modify_profile(user_id, move |profile| profile.education.insert(0, entry))
            .await
    }

    async fn pull_experience(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> StoreResult<Option<Profile>> {
        self.modify_profile(user_id, |profile| {
            profile.remove_experience(entry_id);
        })
        .await
    }

    async fn pull_education(&self, user_id: &str, entry_id: &str) -> StoreResult<Option<Profile>> {
        self.modify_profile(user_id, |profile| {
            profile.remove_education(entry_id);
        })
        .await
    }

    async fn delete_profile(&self, user_id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.profiles.len();
        inner.profiles.retain(|profile| profile.user != user_id);
        Ok(inner.profiles.len() != before)
    }
}
