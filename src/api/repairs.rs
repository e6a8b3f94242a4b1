//! Repair history endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::repair::{RepairHistory, RepairInput},
    AppState,
};

use super::{AppJson, AppPath};

/// List repairs, newest first
#[utoipa::path(
    get,
    path = "/repair-history",
    tag = "repairs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Repair history", body = Vec<RepairHistory>)
    )
)]
pub async fn list_repairs(State(state): State<AppState>) -> AppResult<Json<Vec<RepairHistory>>> {
    let repairs = state.services.repairs.list().await?;
    Ok(Json(repairs))
}

#[utoipa::path(
    put,
    path = "/repair-history/{id}",
    tag = "repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Repair ID")),
    request_body = RepairInput,
    responses(
        (status = 200, description = "Repair updated", body = RepairHistory),
        (status = 404, description = "Repair not found")
    )
)]
pub async fn update_repair(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<RepairInput>,
) -> AppResult<Json<RepairHistory>> {
    let repair = state.services.repairs.update(id, data).await?;
    Ok(Json(repair))
}

#[utoipa::path(
    delete,
    path = "/repair-history/{id}",
    tag = "repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Repair ID")),
    responses(
        (status = 204, description = "Repair deleted"),
        (status = 404, description = "Repair not found")
    )
)]
pub async fn delete_repair(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.repairs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
