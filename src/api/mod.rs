//! API handlers for Maintrack REST endpoints

pub mod auth;
pub mod equipment;
pub mod gate;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod repairs;
pub mod routes;
pub mod search;
pub mod suppliers;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::request::Parts,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, services::tokens::SessionClaims};

/// Session claims attached by the role gate
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .copied()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// `Json` body whose rejections render as a 400 `AppError`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` string whose rejections render as a 400 `AppError`
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// `Path` parameters whose rejections render as a 400 `AppError`
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Plain confirmation body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
