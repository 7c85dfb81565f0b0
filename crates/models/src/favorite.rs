use std::fmt;

use serde::{Deserialize, Serialize};

/// External movie identifier. Catalog ids arrive either as JSON numbers or
/// strings; `42` and `"42"` are distinct ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FavoriteId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavoriteId::Number(n) => write!(f, "{n}"),
            FavoriteId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FavoriteId {
    fn from(value: i64) -> Self { FavoriteId::Number(value) }
}

impl From<&str> for FavoriteId {
    fn from(value: &str) -> Self { FavoriteId::Text(value.to_string()) }
}

/// A movie saved to a user's list. Only `id` takes part in dedup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster: String,
}

impl Favorite {
    pub fn new(id: impl Into<FavoriteId>, title: impl Into<String>, poster: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), poster: poster.into() }
    }
}
