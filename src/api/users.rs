//! User management endpoints

use axum::{
    extract::State,
    Json,
};

use crate::{
    error::AppResult,
    models::user::{EditUser, User, UserQuery},
    AppState,
};

use super::{AppJson, AppPath, AppQuery, AuthenticatedUser, MessageResponse};

/// List users, optionally restricted to one role
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserQuery>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list(&query).await?;
    Ok(Json(users))
}

/// Edit a user account
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = EditUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already used")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<EditUser>,
) -> AppResult<Json<User>> {
    tracing::debug!(admin_id = claims.user_id, user_id = id, "Editing user");
    let user = state.services.users.update(id, data).await?;
    Ok(Json(user))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(admin_id = claims.user_id, user_id = id, "Deleting user");
    state.services.users.delete(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
