//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, maintenance, repairs, search, suppliers, users};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token returned by /login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Maintrack API",
        version = "1.0.0",
        description = "Equipment maintenance management REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::confirm,
        auth::login,
        // Users
        users::list_users,
        users::update_user,
        users::delete_user,
        // Equipment
        equipment::list_equipment,
        equipment::equipment_stats,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::create_equipment_maintenance,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::create_maintenance,
        maintenance::get_maintenance,
        maintenance::update_maintenance,
        maintenance::delete_maintenance,
        maintenance::create_repair,
        // Repairs
        repairs::list_repairs,
        repairs::update_repair,
        repairs::delete_repair,
        // Suppliers
        suppliers::list_suppliers,
        suppliers::get_supplier,
        suppliers::create_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier,
        suppliers::create_supplier_equipment,
        suppliers::update_supplier_equipment,
        // Search
        search::search,
        search::search_detail,
    ),
    components(
        schemas(
            // Auth & users
            crate::models::user::User,
            crate::models::user::RegisterRequest,
            crate::models::user::RegisterResponse,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::EditUser,
            crate::models::Role,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentInput,
            crate::models::equipment::EquipmentDetail,
            crate::models::equipment::StatusCount,
            crate::models::EquipmentStatus,
            // Maintenance
            crate::models::maintenance::MaintenanceSchedule,
            crate::models::maintenance::CreateMaintenance,
            crate::models::maintenance::UpdateMaintenance,
            crate::models::maintenance::MaintenanceDetail,
            crate::models::MaintenanceStatus,
            // Repairs
            crate::models::repair::RepairHistory,
            crate::models::repair::RepairInput,
            // Suppliers
            crate::models::supplier::Supplier,
            crate::models::supplier::SupplierInput,
            crate::models::supplier::SupplierDetail,
            // Search
            crate::models::search::SearchHit,
            crate::models::search::SearchKind,
            crate::models::search::SearchDetail,
            // Common
            health::HealthResponse,
            crate::api::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, confirmation and login"),
        (name = "users", description = "User management"),
        (name = "equipment", description = "Equipment management"),
        (name = "maintenance", description = "Maintenance scheduling"),
        (name = "repairs", description = "Repair history"),
        (name = "suppliers", description = "Supplier management"),
        (name = "search", description = "Free-text search")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
