//! Registration, confirmation and login endpoints

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    AppState,
};

use super::AppJson;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmQuery {
    /// Confirmation token from the emailed link
    pub token: Option<String>,
}

/// Start a registration and email a confirmation link
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Confirmation email queued", body = RegisterResponse),
        (status = 400, description = "Missing or invalid field", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let response = state.services.auth.register(request).await?;
    Ok(Json(response))
}

/// Follow a confirmation link; always answers with a redirect to the frontend
#[utoipa::path(
    get,
    path = "/confirm",
    tag = "auth",
    params(ConfirmQuery),
    responses(
        (status = 303, description = "Redirect to the registration complete or failure page")
    )
)]
pub async fn confirm(State(state): State<AppState>, Query(query): Query<ConfirmQuery>) -> Redirect {
    let outcome = state.services.auth.confirm(query.token.as_deref()).await;
    if let Err(failure) = &outcome {
        tracing::info!(reason = %failure, "Registration confirmation refused");
    }
    Redirect::to(&state.services.auth.confirmation_redirect(&outcome))
}

/// Exchange credentials for a session token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.services.auth.login(request).await?;
    Ok(Json(response))
}
