//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{enums::EquipmentStatus, maintenance::MaintenanceSchedule};

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub status: EquipmentStatus,
    pub price: Decimal,
    pub supplier_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Create or replace equipment request (PUT replaces every field)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EquipmentInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub category: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: EquipmentStatus,
    #[validate(custom(function = "non_negative"))]
    #[serde(default)]
    pub price: Decimal,
    pub supplier_id: Option<i32>,
}

fn default_status() -> EquipmentStatus {
    EquipmentStatus::Active
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

/// Equipment with its maintenance schedules
#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentDetail {
    pub equipment: Equipment,
    pub schedules: Vec<MaintenanceSchedule>,
}

/// Number of equipment per status
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: EquipmentStatus,
    pub count: i64,
}
