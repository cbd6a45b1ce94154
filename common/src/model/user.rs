use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a user registers with.
///
/// Labels outside the known set are kept as [`UserType::Other`] so records
/// written by other clients still load. An empty label reads as the default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    #[default]
    Donor,
    Recipient,
    Volunteer,
    Admin,
    Other(String),
}

impl UserType {
    pub fn as_str(&self) -> &str {
        match self {
            UserType::Donor => "donor",
            UserType::Recipient => "recipient",
            UserType::Volunteer => "volunteer",
            UserType::Admin => "admin",
            UserType::Other(label) => label,
        }
    }
}

impl From<String> for UserType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "" | "donor" => UserType::Donor,
            "recipient" => UserType::Recipient,
            "volunteer" => UserType::Volunteer,
            "admin" => UserType::Admin,
            _ => UserType::Other(label),
        }
    }
}

impl From<UserType> for String {
    fn from(kind: UserType) -> Self {
        match kind {
            UserType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// A stored user record, including its password hash.
///
/// The field names match the JSON layout of the file backend (`users.json`),
/// so the struct is persisted as-is there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: i64,
    pub user_type: UserType,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A user as returned to clients: everything but the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    #[serde(rename = "user_id")]
    pub id: i64,
    pub user_type: UserType,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            user_type: user.user_type,
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}
