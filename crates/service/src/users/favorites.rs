use std::sync::Arc;

use models::{Favorite, FavoriteId};
use tracing::{debug, info, instrument};

use super::store::{Change, UserStore};
use crate::errors::ServiceError;

/// Favorites list operations for a single user, persisted through `UserStore`.
#[derive(Clone)]
pub struct FavoritesManager {
    store: Arc<UserStore>,
}

impl FavoritesManager {
    pub fn new(store: Arc<UserStore>) -> Self { Self { store } }

    /// Append `favorite` unless its id is already listed; either way returns
    /// the resulting list.
    #[instrument(skip_all, fields(username = %username, favorite_id = %favorite.id))]
    pub async fn add_favorite(&self, username: &str, favorite: Favorite) -> Result<Vec<Favorite>, ServiceError> {
        let (added, list) = self
            .store
            .update_user(username, |user| {
                if user.add_favorite(favorite) {
                    Change::Changed((true, user.favorites.clone()))
                } else {
                    Change::Unchanged((false, user.favorites.clone()))
                }
            })
            .await?;
        if added {
            info!(count = list.len(), "favorite_added");
        } else {
            debug!("favorite already listed");
        }
        Ok(list)
    }

    /// Drop every entry with `favorite_id`; unknown ids are a no-op.
    #[instrument(skip_all, fields(username = %username, favorite_id = %favorite_id))]
    pub async fn remove_favorite(&self, username: &str, favorite_id: &FavoriteId) -> Result<Vec<Favorite>, ServiceError> {
        let (removed, list) = self
            .store
            .update_user(username, |user| {
                let removed = user.remove_favorite(favorite_id);
                let list = user.favorites.clone();
                if removed > 0 { Change::Changed((removed, list)) } else { Change::Unchanged((0, list)) }
            })
            .await?;
        if removed > 0 {
            info!(removed, count = list.len(), "favorite_removed");
        }
        Ok(list)
    }

    /// Favorites in insertion order.
    pub async fn list_favorites(&self, username: &str) -> Result<Vec<Favorite>, ServiceError> {
        self.store.read_user(username, |user| user.favorites.clone()).await
    }
}
