//! Maintenance schedule endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        maintenance::{CreateMaintenance, MaintenanceDetail, MaintenanceSchedule, UpdateMaintenance},
        repair::{RepairHistory, RepairInput},
    },
    AppState,
};

use super::{AppJson, AppPath};

/// List maintenance schedules
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Schedules", body = Vec<MaintenanceSchedule>)
    )
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MaintenanceSchedule>>> {
    let schedules = state.services.maintenance.list().await?;
    Ok(Json(schedules))
}

/// Schedule maintenance (equipment_id in the body)
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenance,
    responses(
        (status = 201, description = "Maintenance scheduled", body = MaintenanceSchedule),
        (status = 400, description = "equipment_id missing"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_maintenance(
    State(state): State<AppState>,
    AppJson(data): AppJson<CreateMaintenance>,
) -> AppResult<(StatusCode, Json<MaintenanceSchedule>)> {
    let schedule = state.services.maintenance.create(None, data).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Get a schedule with its repair history
#[utoipa::path(
    get,
    path = "/maintenances/{id}",
    tag = "maintenance",
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Schedule details", body = MaintenanceDetail),
        (status = 404, description = "Maintenance not found")
    )
)]
pub async fn get_maintenance(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<MaintenanceDetail>> {
    let detail = state.services.maintenance.get_detail(id).await?;
    Ok(Json(detail))
}

/// Update a schedule
#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    request_body = UpdateMaintenance,
    responses(
        (status = 200, description = "Schedule updated", body = MaintenanceSchedule)
    )
)]
pub async fn update_maintenance(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateMaintenance>,
) -> AppResult<Json<MaintenanceSchedule>> {
    let schedule = state.services.maintenance.update(id, data).await?;
    Ok(Json(schedule))
}

/// Delete a schedule and its repairs
#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Maintenance not found")
    )
)]
pub async fn delete_maintenance(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.maintenance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a repair; completes the schedule and reactivates the equipment
#[utoipa::path(
    post,
    path = "/maintenance/{id}/repair-history",
    tag = "repairs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    request_body = RepairInput,
    responses(
        (status = 201, description = "Repair recorded", body = RepairHistory),
        (status = 404, description = "Maintenance not found")
    )
)]
pub async fn create_repair(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<RepairInput>,
) -> AppResult<(StatusCode, Json<RepairHistory>)> {
    let repair = state.services.repairs.create(id, data).await?;
    Ok((StatusCode::CREATED, Json(repair)))
}
