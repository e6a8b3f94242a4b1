//! Equipment API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        equipment::{Equipment, EquipmentDetail, EquipmentInput, StatusCount},
        maintenance::{CreateMaintenance, MaintenanceSchedule},
    },
    AppState,
};

use super::{AppJson, AppPath, AuthenticatedUser, MessageResponse};

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipments",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(State(state): State<AppState>) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(equipment))
}

/// Equipment counts per status
#[utoipa::path(
    get,
    path = "/equipments/stats",
    tag = "equipment",
    responses(
        (status = 200, description = "Counts per status", body = Vec<StatusCount>)
    )
)]
pub async fn equipment_stats(State(state): State<AppState>) -> AppResult<Json<Vec<StatusCount>>> {
    let stats = state.services.equipment.stats().await?;
    Ok(Json(stats))
}

/// Get equipment with its maintenance schedules
#[utoipa::path(
    get,
    path = "/equipments/{id}",
    tag = "equipment",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentDetail),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<EquipmentDetail>> {
    let detail = state.services.equipment.get_detail(id).await?;
    Ok(Json(detail))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipments",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = EquipmentInput,
    responses(
        (status = 201, description = "Equipment created", body = Equipment)
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AppJson(data): AppJson<EquipmentInput>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    let equipment = state.services.equipment.create(data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipments/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = EquipmentInput,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment)
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<EquipmentInput>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.update(id, data).await?;
    Ok(Json(equipment))
}

/// Delete equipment with its schedules and repair history
#[utoipa::path(
    delete,
    path = "/equipments/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment deleted", body = MessageResponse),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(user_id = claims.user_id, equipment_id = id, "Deleting equipment");
    state.services.equipment.delete(id).await?;
    Ok(Json(MessageResponse::new("Equipment deleted successfully")))
}

/// Schedule maintenance for this equipment
#[utoipa::path(
    post,
    path = "/equipments/{id}/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = CreateMaintenance,
    responses(
        (status = 201, description = "Maintenance scheduled", body = MaintenanceSchedule),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_equipment_maintenance(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<CreateMaintenance>,
) -> AppResult<(StatusCode, Json<MaintenanceSchedule>)> {
    let schedule = state.services.maintenance.create(Some(id), data).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}
