//! Role gate: session authentication followed by a static role check

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use crate::{error::AppError, models::Role, services::tokens::SessionClaims, AppState};

pub const ALL: &[Role] = &[Role::Admin, Role::Technician, Role::Viewer];
pub const STAFF: &[Role] = &[Role::Admin, Role::Technician];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Extract token from Authorization header
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validate the bearer session token and attach its claims to the request
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return AppError::Unauthorized("Missing or malformed authorization header".to_string())
            .into_response();
    };

    match state.services.auth.tokens().validate_session(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "Session token rejected");
            AppError::from(e).into_response()
        }
    }
}

/// Let the request through only if the authenticated role is in `allowed`.
/// Must run after `authenticate`.
pub async fn authorize(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Response {
    match request.extensions().get::<SessionClaims>() {
        Some(claims) if allowed.contains(&claims.role) => next.run(request).await,
        Some(claims) => {
            tracing::info!(
                user_id = claims.user_id,
                role = %claims.role,
                method = %request.method(),
                path = %request.uri().path(),
                "Access denied by role"
            );
            AppError::Forbidden("Insufficient role for this resource".to_string()).into_response()
        }
        None => AppError::Unauthorized("Authentication required".to_string()).into_response(),
    }
}

/// Wrap a route so it is only reachable by the given roles
pub fn restrict(
    route: MethodRouter<AppState>,
    state: &AppState,
    allowed: &'static [Role],
) -> MethodRouter<AppState> {
    // Layers wrap outwards: authenticate runs first, then authorize.
    // `route_layer` leaves the method fallback alone, so other verbs still get 405.
    let authorized: MethodRouter<AppState> =
        route.route_layer(middleware::from_fn_with_state(allowed, authorize));
    authorized.route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}
