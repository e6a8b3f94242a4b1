//! Repair history model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::equipment::non_negative;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RepairHistory {
    pub id: i32,
    pub maintenance_id: i32,
    pub repair_date: DateTime<Utc>,
    pub issue_description: String,
    pub cost: Decimal,
    pub technician_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Create or replace a repair record
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RepairInput {
    pub repair_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "issue_description is required"))]
    pub issue_description: String,
    #[validate(custom(function = "non_negative"))]
    #[serde(default)]
    pub cost: Decimal,
    pub technician_id: Option<i32>,
}
