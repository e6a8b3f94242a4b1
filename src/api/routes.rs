//! Router wiring with per-route role sets

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    api::{
        self,
        gate::{restrict, ADMIN_ONLY, ALL, STAFF},
    },
    config::ServerConfig,
    AppState,
};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let s = &state;

    let api_routes = Router::new()
        // Public
        .route("/health", get(api::health::health_check))
        .route("/register", post(api::auth::register))
        .route("/confirm", get(api::auth::confirm))
        .route("/login", post(api::auth::login))
        .route("/equipments/stats", get(api::equipment::equipment_stats))
        .route("/equipments/:id", get(api::equipment::get_equipment))
        .route("/maintenances/:id", get(api::maintenance::get_maintenance))
        .route("/search", get(api::search::search))
        .route("/search/detail", get(api::search::search_detail))
        // Users
        .route("/users", restrict(get(api::users::list_users), s, STAFF))
        .route("/users/:id", restrict(put(api::users::update_user), s, ADMIN_ONLY))
        .route("/users/:id", restrict(delete(api::users::delete_user), s, ADMIN_ONLY))
        // Equipment
        .route("/equipments", restrict(get(api::equipment::list_equipment), s, ALL))
        .route("/equipments", restrict(post(api::equipment::create_equipment), s, STAFF))
        .route("/equipments/:id", restrict(put(api::equipment::update_equipment), s, STAFF))
        .route("/equipments/:id", restrict(delete(api::equipment::delete_equipment), s, STAFF))
        .route(
            "/equipments/:id/maintenance",
            restrict(post(api::equipment::create_equipment_maintenance), s, STAFF),
        )
        // Maintenance
        .route("/maintenance", restrict(get(api::maintenance::list_maintenance), s, ALL))
        .route("/maintenance", restrict(post(api::maintenance::create_maintenance), s, STAFF))
        .route("/maintenance/:id", restrict(put(api::maintenance::update_maintenance), s, STAFF))
        .route(
            "/maintenance/:id",
            restrict(delete(api::maintenance::delete_maintenance), s, ADMIN_ONLY),
        )
        .route(
            "/maintenance/:id/repair-history",
            restrict(post(api::maintenance::create_repair), s, STAFF),
        )
        // Repair history
        .route("/repair-history", restrict(get(api::repairs::list_repairs), s, ALL))
        .route("/repair-history/:id", restrict(put(api::repairs::update_repair), s, STAFF))
        .route("/repair-history/:id", restrict(delete(api::repairs::delete_repair), s, STAFF))
        // Suppliers
        .route("/suppliers", restrict(get(api::suppliers::list_suppliers), s, ALL))
        .route("/suppliers", restrict(post(api::suppliers::create_supplier), s, STAFF))
        .route("/suppliers/:id", restrict(get(api::suppliers::get_supplier), s, ALL))
        .route("/suppliers/:id", restrict(put(api::suppliers::update_supplier), s, STAFF))
        .route("/suppliers/:id", restrict(delete(api::suppliers::delete_supplier), s, ADMIN_ONLY))
        .route(
            "/suppliers/:id/equipments",
            restrict(post(api::suppliers::create_supplier_equipment), s, STAFF),
        )
        .route(
            "/suppliers/:sid/equipments/:eid",
            restrict(put(api::suppliers::update_supplier_equipment), s, STAFF),
        )
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api_routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.server))
}

/// CORS from configuration; an empty origin list allows any origin
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
