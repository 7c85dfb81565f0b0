use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::favorite::{Favorite, FavoriteId};

/// Stored account record, serialized as-is into the snapshot file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub favorites: Vec<Favorite>,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { id: id.into(), username: username.into(), password: password.into(), favorites: Vec::new() }
    }

    /// Appends `favorite` unless an entry with the same id exists.
    /// Returns whether the list changed.
    pub fn add_favorite(&mut self, favorite: Favorite) -> bool {
        if self.favorites.iter().any(|f| f.id == favorite.id) {
            return false;
        }
        self.favorites.push(favorite);
        true
    }

    /// Drops every entry with the given id; returns how many were removed.
    pub fn remove_favorite(&mut self, id: &FavoriteId) -> usize {
        let before = self.favorites.len();
        self.favorites.retain(|f| &f.id != id);
        before - self.favorites.len()
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self)
    }
}

/// Public view of a user: everything except the password.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub favorites: Vec<Favorite>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self { id: u.id.clone(), username: u.username.clone(), favorites: u.favorites.clone() }
    }
}

/// Fields an administrator may overwrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserField {
    Username,
    Password,
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    Ok(())
}

/// Structural checks for a loaded collection: non-empty ids, no repeated
/// user ids, no repeated favorite ids within a user.
///
/// Repeated usernames are accepted here: an admin rename is not checked for
/// collisions, so a snapshot written by this service may contain them.
pub fn validate_collection(users: &[User]) -> Result<(), ModelError> {
    let mut ids = HashSet::with_capacity(users.len());
    for (idx, user) in users.iter().enumerate() {
        if user.id.is_empty() {
            return Err(ModelError::Malformed(format!("record {idx} has an empty id")));
        }
        if !ids.insert(user.id.as_str()) {
            return Err(ModelError::Malformed(format!("duplicate user id {}", user.id)));
        }
        let mut seen = HashSet::with_capacity(user.favorites.len());
        for fav in &user.favorites {
            if !seen.insert(&fav.id) {
                return Err(ModelError::Malformed(format!(
                    "user {} lists favorite {} more than once",
                    user.id, fav.id
                )));
            }
        }
    }
    Ok(())
}

/// Parses snapshot bytes into a validated collection.
pub fn parse_collection(bytes: &[u8]) -> Result<Vec<User>, ModelError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| ModelError::Malformed(format!("invalid json: {e}")))?;
    if !value.is_array() {
        return Err(ModelError::Malformed("top-level value is not an array".into()));
    }
    let users: Vec<User> =
        serde_json::from_value(value).map_err(|e| ModelError::Malformed(format!("invalid user record: {e}")))?;
    validate_collection(&users)?;
    Ok(users)
}
