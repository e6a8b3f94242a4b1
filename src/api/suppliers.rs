//! Supplier endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        equipment::{Equipment, EquipmentInput},
        supplier::{Supplier, SupplierDetail, SupplierInput},
    },
    AppState,
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// List suppliers
#[utoipa::path(
    get,
    path = "/suppliers",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Suppliers", body = Vec<Supplier>)
    )
)]
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = state.services.suppliers.list().await?;
    Ok(Json(suppliers))
}

/// Get a supplier with its equipment
#[utoipa::path(
    get,
    path = "/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier details", body = SupplierDetail),
        (status = 404, description = "Supplier not found")
    )
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<SupplierDetail>> {
    let detail = state.services.suppliers.get_detail(id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/suppliers",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    request_body = SupplierInput,
    responses(
        (status = 201, description = "Supplier created", body = Supplier)
    )
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    AppJson(data): AppJson<SupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let supplier = state.services.suppliers.create(data).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

#[utoipa::path(
    put,
    path = "/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Supplier ID")),
    request_body = SupplierInput,
    responses(
        (status = 200, description = "Supplier updated", body = Supplier),
        (status = 404, description = "Supplier not found")
    )
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    let supplier = state.services.suppliers.update(id, data).await?;
    Ok(Json(supplier))
}

/// Delete a supplier and everything attached to its equipment
#[utoipa::path(
    delete,
    path = "/suppliers/{id}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 204, description = "Supplier deleted"),
        (status = 404, description = "Supplier not found")
    )
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    tracing::debug!(admin_id = claims.user_id, supplier_id = id, "Deleting supplier");
    state.services.suppliers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add equipment provided by this supplier
#[utoipa::path(
    post,
    path = "/suppliers/{id}/equipments",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Supplier ID")),
    request_body = EquipmentInput,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 404, description = "Supplier not found")
    )
)]
pub async fn create_supplier_equipment(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<EquipmentInput>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    let equipment = state.services.equipment.create_for_supplier(id, data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

#[utoipa::path(
    put,
    path = "/suppliers/{sid}/equipments/{eid}",
    tag = "suppliers",
    security(("bearer_auth" = [])),
    params(
        ("sid" = i32, Path, description = "Supplier ID"),
        ("eid" = i32, Path, description = "Equipment ID")
    ),
    request_body = EquipmentInput,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found for this supplier")
    )
)]
pub async fn update_supplier_equipment(
    State(state): State<AppState>,
    AppPath((sid, eid)): AppPath<(i32, i32)>,
    AppJson(data): AppJson<EquipmentInput>,
) -> AppResult<Json<Equipment>> {
    let equipment = state
        .services
        .equipment
        .update_for_supplier(sid, eid, data)
        .await?;
    Ok(Json(equipment))
}
