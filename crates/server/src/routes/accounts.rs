use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use common::types::Ack;
use models::Favorite;
use serde::{Deserialize, Serialize};
use service::{FavoritesManager, ServiceError, UserStore};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiQuery};

/// Shared handler state: the one store instance and its favorites view.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserStore>,
    pub favorites: FavoritesManager,
}

impl ServerState {
    pub fn new(users: Arc<UserStore>) -> Self {
        let favorites = FavoritesManager::new(Arc::clone(&users));
        Self { users, favorites }
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SignupOutput {
    pub success: bool,
    pub message: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserIdOutput {
    pub success: bool,
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserFavoritesOutput {
    pub success: bool,
    pub username: String,
    pub favorites: Vec<Favorite>,
}

pub async fn signup(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CredentialsInput>,
) -> Result<Json<SignupOutput>, ApiError> {
    let user = state.users.create_user(&input.username, &input.password).await?;
    Ok(Json(SignupOutput { success: true, message: "Signup successful".into(), user_id: user.id }))
}

pub async fn login(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CredentialsInput>,
) -> Result<Json<Ack>, ApiError> {
    if state.users.authenticate(&input.username, &input.password).await {
        Ok(Json(Ack::ok("Login successful")))
    } else {
        Err(ApiError(ServiceError::AuthFailure))
    }
}

pub async fn get_user_id(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<UsernameQuery>,
) -> Result<Json<UserIdOutput>, ApiError> {
    let user = state.users.find_by_username(&q.username).await?;
    Ok(Json(UserIdOutput { success: true, user_id: user.id }))
}

pub async fn user_favorites_by_id(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserFavoritesOutput>, ApiError> {
    let user = state.users.find_by_id(&user_id).await?;
    Ok(Json(UserFavoritesOutput { success: true, username: user.username, favorites: user.favorites }))
}
