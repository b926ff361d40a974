pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::*;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

use crate::models::{Education, Experience, Profile, ProfileUpdate, User};

const USERS: &str = "users";
const PROFILES: &str = "profiles";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db_name = database_name(uri);
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes backing the email, handle and one-profile-per-user rules.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let unique = |keys: Document| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };

        let users = self.database().collection::<Document>(USERS);
        match users.create_index(unique(doc! { "email": 1 })).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let profiles = self.database().collection::<Document>(PROFILES);
        match profiles.create_index(unique(doc! { "handle": 1 })).await {
            Ok(_) => log::info!("   ✅ Index created: profiles(handle) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create profiles(handle) index: {}", e),
        }
        match profiles.create_index(unique(doc! { "user": 1 })).await {
            Ok(_) => log::info!("   ✅ Index created: profiles(user) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create profiles(user) index: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    fn profiles(&self) -> Collection<Profile> {
        self.collection(PROFILES)
    }

    async fn modify_profile(&self, user_id: &str, update: Document) -> StoreResult<Option<Profile>> {
        self.profiles()
            .find_one_and_update(doc! { "user": user_id }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)
    }
}

/// Database name from the URI path, e.g. `mongodb://host:27017/devconnector`.
fn database_name(uri: &str) -> String {
    uri.split("://")
        .nth(1)
        .and_then(|rest| rest.split_once('/'))
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or("devconnector")
        .to_string()
}

fn store_error(err: MongoError) -> StoreError {
    let duplicate_message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            Some(e.message.as_str())
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY => Some(e.message.as_str()),
        _ => None,
    };

    match duplicate_message {
        Some(message) => StoreError::Duplicate(duplicate_key_field(message)),
        None => StoreError::Backend(err.to_string()),
    }
}

/// Field of the violated index, read from
/// `E11000 duplicate key error collection: db.users index: email_1 dup key: {...}`.
fn duplicate_key_field(message: &str) -> String {
    message
        .split("index: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .map(|index| index.trim_end_matches("_1").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_document(update: &ProfileUpdate) -> Document {
    let mut set = Document::new();
    for (path, value) in update.set_string_fields() {
        set.insert(path, value);
    }
    if let Some(skills) = update.skills.as_set() {
        set.insert("skills", skills.clone());
    }
    set
}

fn to_bson<T: serde::Serialize>(value: &T) -> StoreResult<Bson> {
    mongodb::bson::to_bson(value).map_err(|e| StoreError::Backend(e.to_string()))
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.users()
            .find_one(doc! { "email": email })
            .await
            .map_err(store_error)
    }

    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        self.users()
            .find_one(doc! { "_id": id })
            .await
            .map_err(store_error)
    }

    async fn find_users_by_ids(&self, ids: &[String]) -> StoreResult<Vec<User>> {
        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(store_error)?;
        cursor.try_collect().await.map_err(store_error)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.users()
            .insert_one(user)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let result = self
            .users()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl ProfileStore for MongoDB {
    async fn find_profile_by_user(&self, user_id: &str) -> StoreResult<Option<Profile>> {
        self.profiles()
            .find_one(doc! { "user": user_id })
            .await
            .map_err(store_error)
    }

    async fn find_profile_by_handle(&self, handle: &str) -> StoreResult<Option<Profile>> {
        self.profiles()
            .find_one(doc! { "handle": handle })
            .await
            .map_err(store_error)
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        let cursor = self.profiles().find(doc! {}).await.map_err(store_error)?;
        cursor.try_collect().await.map_err(store_error)
    }

    async fn insert_profile(&self, profile: &Profile) -> StoreResult<()> {
        self.profiles()
            .insert_one(profile)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<Profile>> {
        let set = set_document(update);
        if set.is_empty() {
            return self.find_profile_by_user(user_id).await;
        }
        self.modify_profile(user_id, doc! { "$set": set }).await
    }

    async fn push_experience(
        &self,
        user_id: &str,
        entry: &Experience,
    ) -> StoreResult<Option<Profile>> {
        let entry = to_bson(entry)?;
        self.modify_profile(
            user_id,
            doc! { "$push": { "experience": { "$each": [entry], "$position": 0 } } },
        )
        .await
    }

    async fn push_education(
        &self,
        user_id: &str,
        entry: &Education,
    ) -> StoreResult<Option<Profile>> {
        let entry = to_bson(entry)?;
        self.modify_profile(
            user_id,
            doc! { "$push": { "education": { "$each": [entry], "$position": 0 } } },
        )
        .await
    }

    async fn pull_experience(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> StoreResult<Option<Profile>> {
        self.modify_profile(user_id, doc! { "$pull": { "experience": { "_id": entry_id } } })
            .await
    }

    async fn pull_education(&self, user_id: &str, entry_id: &str) -> StoreResult<Option<Profile>> {
        self.modify_profile(user_id, doc! { "$pull": { "education": { "_id": entry_id } } })
            .await
    }

    async fn delete_profile(&self, user_id: &str) -> StoreResult<bool> {
        let result = self
            .profiles()
            .delete_one(doc! { "user": user_id })
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }
}
