use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{UserField, UserSummary};
use serde::{Deserialize, Serialize};

use super::accounts::{CredentialsInput, ServerState};
use crate::errors::ApiError;
use crate::extract::ApiJson;

#[derive(Debug, Deserialize)]
pub struct EditUserInput {
    pub field: UserField,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub success: bool,
    pub deleted: bool,
}

/// Every account without its password.
pub async fn list_users(State(state): State<ServerState>) -> Json<Vec<UserSummary>> {
    let users = state.users.list_all().await;
    Json(users.iter().map(UserSummary::from).collect())
}

pub async fn add_user(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CredentialsInput>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let user = state.users.create_user(&input.username, &input.password).await?;
    Ok((StatusCode::CREATED, Json(user.summary())))
}

pub async fn edit_user(
    State(state): State<ServerState>,
    Path(username): Path<String>,
    ApiJson(input): ApiJson<EditUserInput>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = state.users.update_field(&username, input.field, &input.value).await?;
    Ok(Json(user.summary()))
}

/// Deleting an unknown user succeeds with `deleted: false`.
pub async fn delete_user(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<DeleteOutput>, ApiError> {
    let deleted = state.users.delete_user(&username).await?;
    Ok(Json(DeleteOutput { success: true, deleted }))
}
