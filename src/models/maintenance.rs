//! Maintenance schedule model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{enums::MaintenanceStatus, repair::RepairHistory};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceSchedule {
    pub id: i32,
    pub equipment_id: i32,
    pub scheduled_date: DateTime<Utc>,
    pub description: String,
    pub status: MaintenanceStatus,
    pub technician_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Create maintenance request; `equipment_id` is taken from the path when the
/// nested route is used
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenance {
    pub equipment_id: Option<i32>,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: MaintenanceStatus,
    /// 0 is treated as "unassigned"
    pub technician_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateMaintenance {
    pub scheduled_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub status: MaintenanceStatus,
    pub technician_id: Option<i32>,
}

/// Maintenance schedule with its repair history
#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceDetail {
    pub maintenance: MaintenanceSchedule,
    pub history: Vec<RepairHistory>,
}

/// Normalize technician ids sent by forms (0 = none)
pub fn assigned_technician(technician_id: Option<i32>) -> Option<i32> {
    technician_id.filter(|id| *id > 0)
}
