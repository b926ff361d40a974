pub mod profile;
pub mod requests;
pub mod user;

pub use profile::*;
pub use requests::*;
pub use user::*;

/// New document id, hex encoded the same way MongoDB renders ObjectIds.
pub fn new_object_id() -> String {
    mongodb::bson::oid::ObjectId::new().to_hex()
}
