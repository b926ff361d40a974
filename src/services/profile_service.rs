use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::{ProfileStore, Store, StoreError, UserStore};
use crate::models::{
    Education, EducationRequest, Experience, ExperienceRequest, Identity, Profile,
    ProfileRequest, ProfileView, UserSummary,
};
use crate::utils::AppError;
use crate::validation::{validate_education, validate_experience, validate_profile};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteAccountResponse {
    pub success: bool,
}

async fn populate(db: &dyn Store, profile: Profile) -> Result<ProfileView, AppError> {
    let owner = db.find_user_by_id(&profile.user).await?;
    Ok(ProfileView::new(profile, owner.as_ref().map(UserSummary::from)))
}

pub async fn get_own_profile(db: &dyn Store, identity: &Identity) -> Result<ProfileView, AppError> {
    let profile = db
        .find_profile_by_user(&identity.id)
        .await?
        .ok_or(AppError::ProfileNotFound)?;
    Ok(ProfileView::new(profile, Some(UserSummary::from(identity))))
}

pub async fn get_profile_by_handle(db: &dyn Store, handle: &str) -> Result<ProfileView, AppError> {
    let profile = db
        .find_profile_by_handle(handle)
        .await?
        .ok_or(AppError::ProfileNotFound)?;
    populate(db, profile).await
}

pub async fn get_profile_by_user(db: &dyn Store, user_id: &str) -> Result<ProfileView, AppError> {
    let profile = db
        .find_profile_by_user(user_id)
        .await?
        .ok_or(AppError::ProfileNotFound)?;
    populate(db, profile).await
}

pub async fn list_profiles(db: &dyn Store) -> Result<Vec<ProfileView>, AppError> {
    let profiles = db.list_profiles().await?;
    if profiles.is_empty() {
        return Err(AppError::NoProfiles);
    }

    let owner_ids: Vec<String> = profiles.iter().map(|p| p.user.clone()).collect();
    let owners: HashMap<String, UserSummary> = db
        .find_users_by_ids(&owner_ids)
        .await?
        .iter()
        .map(|user| (user.id.clone(), UserSummary::from(user)))
        .collect();

    Ok(profiles
        .into_iter()
        .map(|profile| {
            let owner = owners.get(&profile.user).cloned();
            ProfileView::new(profile, owner)
        })
        .collect())
}

/// Creates the caller's profile, or updates it in place when it exists.
/// Only the fields present in the request are written.
pub async fn upsert_profile(
    db: &dyn Store,
    identity: &Identity,
    request: &ProfileRequest,
) -> Result<ProfileView, AppError> {
    let update = validate_profile(request)?;

    if let Some(handle) = update.handle.as_set() {
        if let Some(existing) = db.find_profile_by_handle(handle).await? {
            if existing.user != identity.id {
                return Err(AppError::DuplicateHandle);
            }
        }
    }

    let owner = Some(UserSummary::from(identity));

    if db.find_profile_by_user(&identity.id).await?.is_some() {
        let profile = db
            .update_profile(&identity.id, &update)
            .await?
            .ok_or(AppError::ProfileNotFound)?;
        log::info!("✅ Profile updated for user {}", identity.id);
        return Ok(ProfileView::new(profile, owner));
    }

    let profile = Profile::create(&identity.id, &update);
    match db.insert_profile(&profile).await {
        Ok(()) => {
            log::info!("✅ Profile created for user {} (handle: {})", identity.id, profile.handle);
            Ok(ProfileView::new(profile, owner))
        }
        // Another request created the profile in between; fall back to an update.
        Err(StoreError::Duplicate(key)) if key == "user" => {
            let profile = db
                .update_profile(&identity.id, &update)
                .await?
                .ok_or(AppError::ProfileNotFound)?;
            Ok(ProfileView::new(profile, owner))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn add_experience(
    db: &dyn Store,
    identity: &Identity,
    request: &ExperienceRequest,
) -> Result<ProfileView, AppError> {
    let entry = Experience::from(validate_experience(request)?);
    let profile = db
        .push_experience(&identity.id, &entry)
        .await?
        .ok_or(AppError::ProfileNotFound)?;
    Ok(ProfileView::new(profile, Some(UserSummary::from(identity))))
}

pub async fn add_education(
    db: &dyn Store,
    identity: &Identity,
    request: &EducationRequest,
) -> Result<ProfileView, AppError> {
    let entry = Education::from(validate_education(request)?);
    let profile = db
        .push_education(&identity.id, &entry)
        .await?
        .ok_or(AppError::ProfileNotFound)?;
    Ok(ProfileView::new(profile, Some(UserSummary::from(identity))))
}

/// Removing an id that is not in the list leaves the profile unchanged.
pub async fn remove_experience(
    db: &dyn Store,
    identity: &Identity,
    entry_id: &str,
) -> Result<ProfileView, AppError> {
    let profile = db
        .pull_experience(&identity.id, entry_id)
        .await?
        .ok_or(AppError::ProfileNotFound)?;
    Ok(ProfileView::new(profile, Some(UserSummary::from(identity))))
}

/// Removing an id that is not in the list leaves the profile unchanged.
pub async fn remove_education(
    db: &dyn Store,
    identity: &Identity,
    entry_id: &str,
) -> Result<ProfileView, AppError> {
    let profile = db
        .pull_education(&identity.id, entry_id)
        .await?
        .ok_or(AppError::ProfileNotFound)?;
    Ok(ProfileView::new(profile, Some(UserSummary::from(identity))))
}

/// Deletes the profile (if any) and then the account. The two deletes are
/// independent writes.
pub async fn delete_account(
    db: &dyn Store,
    identity: &Identity,
) -> Result<DeleteAccountResponse, AppError> {
    let profile_deleted = db.delete_profile(&identity.id).await?;
    let user_deleted = db.delete_user(&identity.id).await?;

    log::info!(
        "🗑️  Account {} deleted (profile: {}, user: {})",
        identity.id,
        profile_deleted,
        user_deleted
    );

    Ok(DeleteAccountResponse { success: true })
}
