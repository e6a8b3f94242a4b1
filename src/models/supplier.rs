//! Supplier model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::equipment::Equipment;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SupplierInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "email must be an address"))]
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Supplier with the equipment it provided
#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierDetail {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub equipments: Vec<Equipment>,
}
