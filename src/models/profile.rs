use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_object_id, UserSummary};

/// A single value of a partial update. `Unset` fields are never written.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> Field<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Field::Set(value) => Some(value),
            Field::Unset => None,
        }
    }
}

impl Field<String> {
    /// Missing and blank input both count as "not provided".
    pub fn from_input(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            Some(value) if !value.is_empty() => Field::Set(value.to_string()),
            _ => Field::Unset,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated experience input, not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
    pub current: bool,
    pub description: Option<String>,
}

impl From<NewExperience> for Experience {
    fn from(entry: NewExperience) -> Self {
        Self {
            id: new_object_id(),
            title: entry.title,
            company: entry.company,
            location: entry.location,
            from: entry.from,
            to: entry.to,
            current: entry.current,
            description: entry.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: String,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
    pub current: bool,
    pub description: Option<String>,
}

impl From<NewEducation> for Education {
    fn from(entry: NewEducation) -> Self {
        Self {
            id: new_object_id(),
            school: entry.school,
            degree: entry.degree,
            fieldofstudy: entry.fieldofstudy,
            from: entry.from,
            to: entry.to,
            current: entry.current,
            description: entry.description,
        }
    }
}

/// Stored profile document (collection `profiles`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning user id. At most one profile per user.
    pub user: String,
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub social: Social,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile for `user` with `update` applied on top of empty fields.
    pub fn create(user: &str, update: &ProfileUpdate) -> Self {
        let mut profile = Self {
            id: new_object_id(),
            user: user.to_string(),
            handle: String::new(),
            company: None,
            website: None,
            location: None,
            status: String::new(),
            bio: None,
            githubusername: None,
            skills: Vec::new(),
            social: Social::default(),
            experience: Vec::new(),
            education: Vec::new(),
            date: Utc::now(),
        };
        update.apply(&mut profile);
        profile
    }

    /// Removes the experience entry with `id`. Unknown ids leave the list as is.
    pub fn remove_experience(&mut self, id: &str) -> bool {
        let before = self.experience.len();
        self.experience.retain(|entry| entry.id != id);
        self.experience.len() != before
    }

    /// Removes the education entry with `id`. Unknown ids leave the list as is.
    pub fn remove_education(&mut self, id: &str) -> bool {
        let before = self.education.len();
        self.education.retain(|entry| entry.id != id);
        self.education.len() != before
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialUpdate {
    pub youtube: Field<String>,
    pub twitter: Field<String>,
    pub facebook: Field<String>,
    pub linkedin: Field<String>,
    pub instagram: Field<String>,
}

/// Partial profile write built from request input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub handle: Field<String>,
    pub company: Field<String>,
    pub website: Field<String>,
    pub location: Field<String>,
    pub status: Field<String>,
    pub bio: Field<String>,
    pub githubusername: Field<String>,
    pub skills: Field<Vec<String>>,
    pub social: SocialUpdate,
}

fn apply_optional(target: &mut Option<String>, field: &Field<String>) {
    if let Field::Set(value) = field {
        *target = Some(value.clone());
    }
}

impl ProfileUpdate {
    pub fn apply(&self, profile: &mut Profile) {
        if let Field::Set(handle) = &self.handle {
            profile.handle = handle.clone();
        }
        if let Field::Set(status) = &self.status {
            profile.status = status.clone();
        }
        if let Field::Set(skills) = &self.skills {
            profile.skills = skills.clone();
        }
        apply_optional(&mut profile.company, &self.company);
        apply_optional(&mut profile.website, &self.website);
        apply_optional(&mut profile.location, &self.location);
        apply_optional(&mut profile.bio, &self.bio);
        apply_optional(&mut profile.githubusername, &self.githubusername);

        apply_optional(&mut profile.social.youtube, &self.social.youtube);
        apply_optional(&mut profile.social.twitter, &self.social.twitter);
        apply_optional(&mut profile.social.facebook, &self.social.facebook);
        apply_optional(&mut profile.social.linkedin, &self.social.linkedin);
        apply_optional(&mut profile.social.instagram, &self.social.instagram);
    }

    /// Top-level string fields that are set, keyed by their document path.
    pub fn set_string_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("handle", &self.handle),
            ("company", &self.company),
            ("website", &self.website),
            ("location", &self.location),
            ("status", &self.status),
            ("bio", &self.bio),
            ("githubusername", &self.githubusername),
            ("social.youtube", &self.social.youtube),
            ("social.twitter", &self.social.twitter),
            ("social.facebook", &self.social.facebook),
            ("social.linkedin", &self.social.linkedin),
            ("social.instagram", &self.social.instagram),
        ]
        .into_iter()
        .filter_map(|(path, field)| field.as_set().map(|value| (path, value.as_str())))
        .collect()
    }
}

/// Profile as returned to clients, with the owner populated.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileView {
    #[serde(rename = "_id")]
    pub id: String,
    /// `null` when the owning account no longer exists.
    pub user: Option<UserSummary>,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: Social,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

impl ProfileView {
    pub fn new(profile: Profile, user: Option<UserSummary>) -> Self {
        Self {
            id: profile.id,
            user,
            handle: profile.handle,
            company: profile.company,
            website: profile.website,
            location: profile.location,
            status: profile.status,
            bio: profile.bio,
            githubusername: profile.githubusername,
            skills: profile.skills,
            social: profile.social,
            experience: profile.experience,
            education: profile.education,
            date: profile.date,
        }
    }
}
