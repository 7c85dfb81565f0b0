use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use models::{Favorite, FavoriteId};
use serde::{Deserialize, Serialize};
use service::ServiceError;

use super::accounts::{ServerState, UsernameQuery};
use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiQuery};

#[derive(Debug, Deserialize)]
pub struct SaveFavoriteInput {
    pub username: String,
    pub id: FavoriteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFavoriteInput {
    pub username: String,
    pub id: FavoriteId,
}

#[derive(Debug, Serialize)]
pub struct FavoritesOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub favorites: Vec<Favorite>,
}

pub async fn save_favorite(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<SaveFavoriteInput>,
) -> Result<Json<FavoritesOutput>, ApiError> {
    let favorite = Favorite { id: input.id, title: input.title, poster: input.poster };
    let favorites = state.favorites.add_favorite(&input.username, favorite).await?;
    Ok(Json(FavoritesOutput { success: true, message: Some("Favorite saved".into()), favorites }))
}

/// Unknown users get `404 {success:false, favorites:[]}` rather than the generic error body.
pub async fn get_favorites(State(state): State<ServerState>, ApiQuery(q): ApiQuery<UsernameQuery>) -> Response {
    match state.favorites.list_favorites(&q.username).await {
        Ok(favorites) => Json(FavoritesOutput { success: true, message: None, favorites }).into_response(),
        Err(ServiceError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(FavoritesOutput { success: false, message: None, favorites: Vec::new() }),
        )
            .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

pub async fn remove_favorite(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<RemoveFavoriteInput>,
) -> Result<Json<FavoritesOutput>, ApiError> {
    let favorites = state.favorites.remove_favorite(&input.username, &input.id).await?;
    Ok(Json(FavoritesOutput { success: true, message: Some("Favorite removed".into()), favorites }))
}
